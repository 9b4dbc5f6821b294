use std::path::{Path, PathBuf};

use crate::error::{DeployerError, Result};
use crate::ini;

use super::routing::RoutingBlock;
use super::settings::Settings;

/// Section forwarded verbatim into the generated vassal config.
pub const SERVICE_SECTION: &str = "uwsgi";
/// Section consumed by the deployer itself.
pub const CONTROL_SECTION: &str = "vassaldeployer";
pub const DEFAULT_INTERPRETER: &str = "python3";

const VENV_DIR_NAME: &str = "venv";

/// A loaded vassal descriptor: a `[uwsgi]` section that is passed through to
/// the generated config and a `[vassaldeployer]` section that drives
/// provisioning and routing.
///
/// Required keys are checked lazily: accessors return
/// [`DeployerError::MissingKey`] on first use.
#[derive(Debug, Clone)]
pub struct Descriptor {
    path: PathBuf,
    service: Settings,
    control: Settings,
}

impl Descriptor {
    pub fn new(path: PathBuf, service: Settings, control: Settings) -> Self {
        Self {
            path,
            service,
            control,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used for log lines and for the generated config.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }

    pub fn service_settings(&self) -> &Settings {
        &self.service
    }

    pub fn control_settings(&self) -> &Settings {
        &self.control
    }

    fn required<'a>(settings: &'a Settings, section: &str, key: &str) -> Result<&'a str> {
        settings
            .get(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| DeployerError::missing_key(section, key))
    }

    pub fn socket(&self) -> Result<&str> {
        Self::required(&self.service, SERVICE_SECTION, "socket")
    }

    pub fn home(&self) -> Result<PathBuf> {
        Self::required(&self.service, SERVICE_SECTION, "home").map(PathBuf::from)
    }

    /// Explicit `virtualenv`, else `<home>/venv`.
    pub fn isolated_env_path(&self) -> Result<PathBuf> {
        match self.service.get("virtualenv").filter(|v| !v.is_empty()) {
            Some(venv) => Ok(PathBuf::from(venv)),
            None => Ok(self.home()?.join(VENV_DIR_NAME)),
        }
    }

    pub fn port(&self) -> Result<u16> {
        parse_port(self.socket()?)
    }

    pub fn target_url(&self) -> Result<&str> {
        Self::required(&self.control, CONTROL_SECTION, "app_url")
    }

    pub fn interpreter(&self) -> &str {
        self.control
            .get("python")
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_INTERPRETER)
    }

    pub fn dependency_specs(&self) -> Vec<String> {
        self.control
            .get("requirements")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn installer_args(&self) -> Vec<String> {
        self.control
            .get("pip_options")
            .unwrap_or_default()
            .split_whitespace()
            .map(String::from)
            .collect()
    }

    /// Values the deployer injects into the generated config. The resolved
    /// environment path is always written out, even when the source relied
    /// on the `<home>/venv` default.
    pub fn service_overrides(&self) -> Result<Settings> {
        let venv = self.isolated_env_path()?;
        Ok([("virtualenv", venv.to_string_lossy().to_string())]
            .into_iter()
            .collect())
    }

    /// The `[uwsgi]` section with `overrides` merged on top.
    pub fn render_service_config(&self, overrides: &Settings) -> String {
        ini::render_section(SERVICE_SECTION, &self.service.merged(overrides))
    }

    pub fn routing_block(&self) -> Result<RoutingBlock> {
        Ok(RoutingBlock::new(self.target_url()?, self.port()?))
    }

    pub fn render_routing_block(&self) -> Result<String> {
        Ok(self.routing_block()?.render())
    }
}

/// Port of a `host:port` socket. The host part may itself contain colons.
pub fn parse_port(socket: &str) -> Result<u16> {
    let (_, port) = socket
        .rsplit_once(':')
        .ok_or_else(|| DeployerError::InvalidSocket(socket.to_string()))?;
    port.trim()
        .parse()
        .map_err(|_| DeployerError::InvalidSocket(socket.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(service: &[(&str, &str)], control: &[(&str, &str)]) -> Descriptor {
        Descriptor::new(
            PathBuf::from("/in/app1.ini"),
            service.iter().copied().collect(),
            control.iter().copied().collect(),
        )
    }

    #[test]
    fn port_comes_from_socket() {
        let d = descriptor(&[("socket", "127.0.0.1:3030")], &[]);
        assert_eq!(d.socket().unwrap(), "127.0.0.1:3030");
        assert_eq!(d.port().unwrap(), 3030);
    }

    #[test]
    fn malformed_socket_is_a_typed_error() {
        for socket in ["127.0.0.1", "127.0.0.1:http", "127.0.0.1:70000", "localhost:"] {
            let d = descriptor(&[("socket", socket)], &[]);
            assert!(
                matches!(d.port(), Err(DeployerError::InvalidSocket(ref s)) if s == socket),
                "socket {socket}"
            );
        }
    }

    #[test]
    fn missing_socket_names_the_key() {
        let d = descriptor(&[("home", "/opt/app")], &[("app_url", "/app1")]);
        match d.port() {
            Err(DeployerError::MissingKey { section, key }) => {
                assert_eq!(section, SERVICE_SECTION);
                assert_eq!(key, "socket");
            }
            other => panic!("expected MissingKey, got {other:?}"),
        }
        assert!(matches!(
            d.render_routing_block(),
            Err(DeployerError::MissingKey { .. })
        ));
    }

    #[test]
    fn isolated_env_defaults_under_home() {
        let d = descriptor(&[("home", "/opt/app1")], &[]);
        assert_eq!(d.isolated_env_path().unwrap(), PathBuf::from("/opt/app1/venv"));

        let explicit = descriptor(&[("home", "/opt/app1"), ("virtualenv", "/srv/venv")], &[]);
        assert_eq!(explicit.isolated_env_path().unwrap(), PathBuf::from("/srv/venv"));

        let neither = descriptor(&[], &[]);
        assert!(matches!(
            neither.isolated_env_path(),
            Err(DeployerError::MissingKey { ref key, .. }) if key == "home"
        ));
    }

    #[test]
    fn control_defaults() {
        let d = descriptor(&[], &[]);
        assert_eq!(d.interpreter(), DEFAULT_INTERPRETER);
        assert!(d.dependency_specs().is_empty());
        assert!(d.installer_args().is_empty());
        assert!(matches!(
            d.target_url(),
            Err(DeployerError::MissingKey { ref section, .. }) if section == CONTROL_SECTION
        ));
    }

    #[test]
    fn requirements_and_pip_options_are_tokenized() {
        let d = descriptor(
            &[],
            &[
                ("python", "python2.7"),
                ("requirements", " pkg1==0.1.2,pkg2==1.2.3, ,pkg3==3.4.5"),
                ("pip_options", "--extra-index=mypypi:8080   --trusted-host mypypi"),
            ],
        );
        assert_eq!(d.interpreter(), "python2.7");
        assert_eq!(
            d.dependency_specs(),
            vec!["pkg1==0.1.2", "pkg2==1.2.3", "pkg3==3.4.5"]
        );
        assert_eq!(
            d.installer_args(),
            vec!["--extra-index=mypypi:8080", "--trusted-host", "mypypi"]
        );
    }

    #[test]
    fn render_merges_overrides_without_mutating() {
        let d = descriptor(&[("home", "/opt/app1"), ("socket", "127.0.0.1:3030")], &[]);
        let overrides = d.service_overrides().unwrap();
        let rendered = d.render_service_config(&overrides);
        assert_eq!(
            rendered,
            "[uwsgi]\nhome=/opt/app1\nsocket=127.0.0.1:3030\nvirtualenv=/opt/app1/venv\n"
        );
        assert!(!d.service_settings().contains_key("virtualenv"));
        assert_eq!(
            d.render_service_config(&Settings::new()),
            "[uwsgi]\nhome=/opt/app1\nsocket=127.0.0.1:3030\n"
        );
    }

    #[test]
    fn routing_block_uses_loopback_and_app_url() {
        let d = descriptor(&[("socket", "0.0.0.0:3030")], &[("app_url", "/app1")]);
        let block = d.render_routing_block().unwrap();
        assert_eq!(block.matches("uwsgi_pass 127.0.0.1:3030;").count(), 1);
        assert_eq!(block.matches("uwsgi_param SCRIPT_NAME /app1;").count(), 1);
    }
}
