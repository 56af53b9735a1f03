//! Utility functions for timestamps and text handling.

pub mod text;
pub mod timestamps;

pub use text::{clean_heading, truncate_chars};
pub use timestamps::{elapsed_ms, iso_timestamp, now_utc, Timestamp};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_timestamp_format() {
        let ts = iso_timestamp();
        assert!(ts.contains('T'));
        assert!(ts.ends_with("+00:00"));
    }
}
