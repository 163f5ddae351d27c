use crate::adapters::catalog::is_remote;
use crate::utils::error::{Result, ShopError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ShopError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ShopError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ShopError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ShopError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ShopError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// A catalog is either an http(s) URL or a local file path. Anything else
/// with a scheme (ftp://, file://) is rejected.
pub fn validate_catalog_location(field_name: &str, location: &str) -> Result<()> {
    if is_remote(location) || location.contains("://") {
        validate_url(field_name, location)
    } else {
        validate_path(field_name, location)
    }
}

/// Keys become file names, so they must be a single plain path segment.
pub fn validate_storage_key(field_name: &str, key: &str) -> Result<()> {
    validate_non_empty_string(field_name, key)?;

    if key.contains(['/', '\\', '\0']) || key == "." || key == ".." {
        return Err(ShopError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: key.to_string(),
            reason: "Key must not contain path separators".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ShopError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ShopError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("catalog", "https://example.com").is_ok());
        assert!(validate_url("catalog", "http://example.com").is_ok());
        assert!(validate_url("catalog", "").is_err());
        assert!(validate_url("catalog", "invalid-url").is_err());
        assert!(validate_url("catalog", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_catalog_location() {
        assert!(validate_catalog_location("catalog", "data/data.json").is_ok());
        assert!(validate_catalog_location("catalog", "https://fakestoreapi.com/products").is_ok());
        assert!(validate_catalog_location("catalog", "file:///tmp/data.json").is_err());
        assert!(validate_catalog_location("catalog", "").is_err());
    }

    #[test]
    fn test_validate_storage_key() {
        assert!(validate_storage_key("key", "cart").is_ok());
        assert!(validate_storage_key("key", " ").is_err());
        assert!(validate_storage_key("key", "../cart").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("timeout", 5, 1).is_ok());
        assert!(validate_positive_number("timeout", 0, 1).is_err());
    }
}
