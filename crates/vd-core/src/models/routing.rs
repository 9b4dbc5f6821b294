/// One nginx `location` mapping a URL prefix to a local uwsgi socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingBlock {
    pub path_prefix: String,
    pub port: u16,
}

impl RoutingBlock {
    pub fn new(path_prefix: impl Into<String>, port: u16) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            port,
        }
    }

    pub fn upstream(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// `SCRIPT_NAME` together with `uwsgi_modifier1 30` makes uwsgi strip the
    /// prefix before the app sees the request path.
    pub fn render(&self) -> String {
        format!(
            "location {prefix} {{\n    \
             include uwsgi_params;\n    \
             uwsgi_pass {upstream};\n    \
             uwsgi_param SCRIPT_NAME {prefix};\n    \
             uwsgi_modifier1 30;\n\
             }}\n",
            prefix = self.path_prefix,
            upstream = self.upstream(),
        )
    }
}

/// The nginx `server` block for a whole batch of vassals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDocument {
    pub site_name: String,
    pub listen_port: u16,
    pub blocks: Vec<RoutingBlock>,
}

impl RoutingDocument {
    pub fn new(site_name: impl Into<String>, listen_port: u16) -> Self {
        Self {
            site_name: site_name.into(),
            listen_port,
            blocks: Vec::new(),
        }
    }

    pub fn conf_file_name(&self) -> String {
        format!("{}.conf", self.site_name)
    }

    pub fn render(&self) -> String {
        let mut conf = format!(
            "server {{\n    listen {};\n    server_tokens off;\n    server_name {};\n",
            self.listen_port, self.site_name
        );
        for block in &self.blocks {
            conf.push('\n');
            for line in block.render().lines() {
                conf.push_str("    ");
                conf.push_str(line);
                conf.push('\n');
            }
        }
        conf.push_str("}\n");
        conf
    }
}
