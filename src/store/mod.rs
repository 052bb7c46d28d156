pub mod layer;
pub mod local;
pub mod remote;

pub use layer::{PersistenceLayer, StoreError};
pub use local::LocalStore;
pub use remote::RemoteStore;
