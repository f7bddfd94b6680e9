pub mod exchangerates_api;
pub mod util;
