pub mod civil;
pub mod hijri;
pub mod month;

pub use civil::{date_range, DateKey};
pub use hijri::{format_hijri, lunar_parts, to_arabic_numerals, LunarParts};
pub use month::{build_lunar_month_days, find_lunar_month_start, LunarMonth};
