//! Response validation hooks.
//!
//! A [`Validator`] runs after a response body has been decoded and may reject
//! it with a message. [`Passthrough`] accepts everything and is what the
//! plain verb methods use. Any `Fn(&R) -> Result<(), String>` also works:
//!
//! ```
//! use api_client::validate::Validator;
//!
//! let has_id = |v: &serde_json::Value| {
//!     v.get("id").map(|_| ()).ok_or_else(|| "missing id".to_string())
//! };
//! assert!(has_id.validate(&serde_json::json!({"id": 1})).is_ok());
//! ```

/// Checks a decoded response before it is handed to the caller.
pub trait Validator<R> {
    fn validate(&self, value: &R) -> Result<(), String>;
}

/// Accepts every response unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl<R> Validator<R> for Passthrough {
    fn validate(&self, _value: &R) -> Result<(), String> {
        Ok(())
    }
}

impl<R, F> Validator<R> for F
where
    F: Fn(&R) -> Result<(), String>,
{
    fn validate(&self, value: &R) -> Result<(), String> {
        self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_accepts_anything() {
        assert!(Passthrough.validate(&42u32).is_ok());
        assert!(Passthrough.validate(&"anything").is_ok());
    }

    #[test]
    fn test_closure_validator() {
        let positive = |n: &i64| {
            if *n > 0 {
                Ok(())
            } else {
                Err(format!("{n} is not positive"))
            }
        };
        assert!(positive.validate(&3).is_ok());
        assert_eq!(positive.validate(&-1), Err("-1 is not positive".to_string()));
    }
}
