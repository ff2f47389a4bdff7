//! The generation parameters and their derived / defaulted forms.
//!
//! Everything here is a pure transform over strings, except
//! [`generate_csrf_key`] which reads the operating system CSPRNG.

use std::path::Path;

use rand::RngCore;
use rand::rngs::OsRng;

use crate::domain::error::DomainError;

/// Port used when none was supplied.
pub const DEFAULT_PORT: &str = "8080";

/// Environment variable holding the base directory for new projects.
pub const BASE_DIR_ENV: &str = "NEW_GO_SERVER_DEFAULT_DIR";

/// Length in bytes of the generated CSRF authentication key.
const CSRF_KEY_BYTES: usize = 32;

/// Parameter values exactly as collected from flags or prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameters {
    pub name: String,
    pub module: String,
    pub description: String,
    pub port: String,
    pub destination_path: String,
}

/// The resolved, defaulted set of generation parameters.
///
/// Built once per run and never mutated afterwards; fields are only readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    name: String,
    module: String,
    description: String,
    port: String,
    destination_path: String,
    csrf_auth_key: String,
}

impl ParameterSet {
    /// Resolve raw values into a consistent parameter set.
    ///
    /// - `module` without a `/` becomes `name/module`
    /// - empty `port` becomes [`DEFAULT_PORT`]
    /// - empty `destination_path` becomes `name`, or `base_dir/name`
    pub fn from_raw(
        raw: RawParameters,
        base_dir: Option<&Path>,
        csrf_auth_key: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = raw.name.trim().to_string();
        validate_name(&name)?;

        let module = raw.module.trim();
        if module.is_empty() {
            return Err(DomainError::Parameter {
                field: "module",
                reason: "module name is required".into(),
            });
        }
        let module = normalize_module(&name, module);

        let port = match raw.port.trim() {
            "" => DEFAULT_PORT.to_string(),
            other => validate_port(other)?,
        };

        let destination_path = match raw.destination_path.trim() {
            "" => default_destination(&name, base_dir),
            other => other.to_string(),
        };

        Ok(Self {
            name,
            module,
            description: raw.description.trim().to_string(),
            port,
            destination_path,
            csrf_auth_key: csrf_auth_key.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn destination_path(&self) -> &str {
        &self.destination_path
    }

    pub fn csrf_auth_key(&self) -> &str {
        &self.csrf_auth_key
    }

    /// Look up a field by its template name (`Name`, `Module`, ...).
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "Name" => Some(&self.name),
            "Module" => Some(&self.module),
            "Description" => Some(&self.description),
            "Port" => Some(&self.port),
            "ProjectPath" => Some(&self.destination_path),
            "CsrfAuthKey" => Some(&self.csrf_auth_key),
            _ => None,
        }
    }
}

/// Rewrite a bare module name into `name/module`; full paths pass through.
pub fn normalize_module(name: &str, module: &str) -> String {
    if module.contains('/') {
        module.to_string()
    } else {
        format!("{name}/{module}")
    }
}

/// Destination used when the user left the path empty.
pub fn default_destination(name: &str, base_dir: Option<&Path>) -> String {
    match base_dir {
        Some(base) if !base.as_os_str().is_empty() => base.join(name).display().to_string(),
        _ => name.to_string(),
    }
}

/// Hex-encoded key drawn from the OS CSPRNG.
///
/// There is no weaker fallback: if secure randomness is unavailable the run
/// fails.
pub fn generate_csrf_key() -> Result<String, DomainError> {
    let mut bytes = [0u8; CSRF_KEY_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| DomainError::Parameter {
            field: "csrf-auth-key",
            reason: format!("secure randomness unavailable: {e}"),
        })?;
    Ok(hex::encode(bytes))
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    let reason = if name.is_empty() {
        "project name is required"
    } else if name == "." || name == ".." {
        "project name cannot be '.' or '..'"
    } else if name.contains('/') || name.contains('\\') {
        "project name cannot contain path separators"
    } else {
        return Ok(());
    };
    Err(DomainError::Parameter {
        field: "name",
        reason: reason.into(),
    })
}

fn validate_port(port: &str) -> Result<String, DomainError> {
    match port.parse::<u16>() {
        Ok(p) if p > 0 => Ok(p.to_string()),
        _ => Err(DomainError::Parameter {
            field: "port",
            reason: format!("'{port}' is not a TCP port (1-65535)"),
        }),
    }
}
