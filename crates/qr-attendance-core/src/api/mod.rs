mod client;
mod payload;

pub use {
    client::{ApiClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT},
    payload::{ApiResponse, RAW_VALUE_KEY},
};
