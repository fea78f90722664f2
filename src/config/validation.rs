//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check route names are unique
//! - Check patterns are well-formed for HTTP paths
//! - Validate value ranges (0 < max path length <= 64 KiB)
//! - Require an API key whenever the admin API is enabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted; the router itself accepts any pattern

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::routing::pattern::CompiledPattern;

/// Largest accepted `router.max_path_len`. The guess cache allocates one
/// bucket per length up front.
pub const MAX_PATH_LEN_LIMIT: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("router.max_path_len must be greater than zero")]
    ZeroMaxPathLen,

    #[error("router.max_path_len {0} exceeds the limit of {MAX_PATH_LEN_LIMIT}")]
    MaxPathLenTooLarge(usize),

    #[error("route '{0}' has an empty pattern")]
    EmptyPattern(String),

    #[error("route '{name}' pattern '{pattern}' must start with '/'")]
    MissingLeadingSlash { name: String, pattern: String },

    #[error("route '{name}' has a parameter without a name")]
    UnnamedParam { name: String },

    #[error("route '{name}' repeats parameter '{param}'")]
    DuplicateParam { name: String, param: String },

    #[error("duplicate route name '{0}'")]
    DuplicateRouteName(String),

    #[error("admin.api_key must be set when the admin API is enabled")]
    MissingAdminKey,
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.router.max_path_len == 0 {
        errors.push(ValidationError::ZeroMaxPathLen);
    } else if config.router.max_path_len > MAX_PATH_LEN_LIMIT {
        errors.push(ValidationError::MaxPathLenTooLarge(
            config.router.max_path_len,
        ));
    }

    let mut names = HashSet::new();
    for route in &config.router.routes {
        if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateRouteName(route.name.clone()));
        }

        if route.pattern.is_empty() {
            errors.push(ValidationError::EmptyPattern(route.name.clone()));
            continue;
        }
        if !route.pattern.starts_with('/') {
            errors.push(ValidationError::MissingLeadingSlash {
                name: route.name.clone(),
                pattern: route.pattern.clone(),
            });
        }

        let compiled = CompiledPattern::compile(&route.pattern);
        let mut params = HashSet::new();
        for param in compiled.param_names() {
            if param.is_empty() {
                errors.push(ValidationError::UnnamedParam {
                    name: route.name.clone(),
                });
            } else if !params.insert(param) {
                errors.push(ValidationError::DuplicateParam {
                    name: route.name.clone(),
                    param: param.to_string(),
                });
            }
        }
    }

    if config.admin.enabled && config.admin.api_key.is_empty() {
        errors.push(ValidationError::MissingAdminKey);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
