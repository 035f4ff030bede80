//! Tool backend registration and dispatch
//!
//! Backends are feature-gated; only those compiled in can be selected with
//! `--tool`.

use rkbackup_core::FlashTool;

/// Information about a tool backend
pub struct ToolInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Backends available in this build
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_tools() -> Vec<ToolInfo> {
    let mut tools = Vec::new();

    #[cfg(feature = "rkdeveloptool")]
    tools.push(ToolInfo {
        name: "rkdeveloptool",
        aliases: &["rk"],
        description: "Rockchip rkdeveloptool subprocess (path=<executable>)",
    });

    #[cfg(feature = "dummy")]
    tools.push(ToolInfo {
        name: "dummy",
        aliases: &[],
        description: "Emulated device for testing (size=<MiB>,fail=<read number>)",
    });

    tools
}

/// Parsed tool selector
#[derive(Debug, PartialEq, Eq)]
pub struct ToolParams<'a> {
    /// Backend name
    pub name: &'a str,
    /// Key-value options
    pub options: Vec<(&'a str, &'a str)>,
}

/// Parse a tool string into name and options
///
/// Format: "name" or "name:key1=value1,key2=value2"
pub fn parse_tool_params(s: &str) -> Result<ToolParams<'_>, Box<dyn std::error::Error>> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));

    let mut options = Vec::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            match opt.split_once('=') {
                Some(pair) => options.push(pair),
                None => {
                    return Err(
                        format!("Invalid parameter format: '{}' (expected key=value)", opt).into(),
                    )
                }
            }
        }
    }

    Ok(ToolParams { name, options })
}

/// Open a tool backend from its selector string
pub fn open_tool(tool: &str) -> Result<Box<dyn FlashTool>, Box<dyn std::error::Error>> {
    let params = parse_tool_params(tool)?;
    log::debug!("Opening tool '{}' with {:?}", params.name, params.options);

    match params.name {
        #[cfg(feature = "rkdeveloptool")]
        "rkdeveloptool" | "rk" => rkbackup_rkdeveloptool::open_rkdeveloptool(&params.options),

        #[cfg(feature = "dummy")]
        "dummy" => {
            let config = rkbackup_dummy::parse_options(&params.options)?;
            Ok(Box::new(rkbackup_dummy::DummyTool::new(config)))
        }

        _ => Err(format!(
            "Unknown tool: {} (available: {})",
            params.name,
            tool_names_short()
        )
        .into()),
    }
}

/// Short comma-separated list of backend names
pub fn tool_names_short() -> String {
    let names: Vec<&str> = available_tools().iter().map(|t| t.name).collect();
    names.join(", ")
}
