//! Installation workflow for a host that is not set up yet.
//!
//! A host flagged with `newhost: true` in its context serves an install
//! form. Submitting it turns the form into the host's context and adds the
//! host to the registry.

use crate::{registry::Registry, report::Report};
use hostreg_core::{Activator, Context, HostStore, VirtualHost};
use serde::Deserialize;
use serde_json::Value;

/// Fields accepted from the install form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InstallForm {
    /// Collection name prefix for this host.
    pub prefix: Option<String>,
    /// Database name.
    pub database: Option<String>,
    /// Database user, stored as `dbuser`.
    pub username: Option<String>,
    /// Database password.
    pub password: Option<String>,
    /// Remote database server, if any.
    pub dbhost: Option<String>,
}

impl InstallForm {
    /// Build a host context from exactly the submitted fields.
    ///
    /// Absent fields stay absent. `username` is stored as `dbuser`.
    pub fn into_context(self) -> Context {
        let mut context = Context::new();
        let fields = [
            ("prefix", self.prefix),
            ("database", self.database),
            ("dbuser", self.username),
            ("password", self.password),
            ("dbhost", self.dbhost),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                context.insert(key.to_owned(), Value::String(value));
            }
        }
        context
    }
}

/// HTTP method of an install request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    /// Request the install form.
    Get,
    /// Submit the install form.
    Post,
}

/// An install request as seen by the handler.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// HTTP method of the request.
    pub method: InstallMethod,
    /// The host the request was addressed to.
    pub host: VirtualHost,
    /// The submitted form, for `Post`.
    pub form: Option<InstallForm>,
}

/// What the request pipeline should render.
#[derive(Debug)]
pub enum InstallOutcome {
    /// Show the install form for `hostname`.
    ShowForm {
        /// Host awaiting installation.
        hostname: String,
    },
    /// The host was installed.
    Installed(Report),
    /// The host is not awaiting installation.
    AlreadyInstalled,
    /// Installation failed.
    Failed {
        /// HTTP status to answer with.
        status: u16,
        /// Message shown to the user.
        message: String,
    },
}

/// Context flag marking a host that still needs installing.
pub const NEW_HOST_FLAG: &str = "newhost";

/// Turns install requests into registry additions.
pub struct Installer<'r, S, A> {
    registry: &'r Registry<S, A>,
}

impl<'r, S: HostStore, A: Activator> Installer<'r, S, A> {
    /// Install into `registry`.
    pub fn new(registry: &'r Registry<S, A>) -> Self {
        Self { registry }
    }

    /// Handle one request against a host awaiting installation.
    pub async fn handle(&self, request: InstallRequest) -> InstallOutcome {
        if !request.host.flag(NEW_HOST_FLAG, false) {
            return InstallOutcome::AlreadyInstalled;
        }

        match request.method {
            InstallMethod::Get => InstallOutcome::ShowForm {
                hostname: request.host.hostname().to_owned(),
            },
            InstallMethod::Post => {
                let Some(form) = request.form else {
                    return InstallOutcome::Failed {
                        status: 400,
                        message: "Error: missing installation form".to_owned(),
                    };
                };
                let mut host = request.host;
                host.set_context(form.into_context());

                match self.registry.add(host).await {
                    Ok(report) => InstallOutcome::Installed(report),
                    Err(err) => {
                        tracing::error!(error = %err, "installation failed");
                        InstallOutcome::Failed {
                            status: 500,
                            message: format!("Error: {err}"),
                        }
                    }
                }
            }
        }
    }
}
