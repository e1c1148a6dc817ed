//! ### Run AccuRev commands
//!
//! One function per command. The request structs only build argument
//! lists, so what gets passed to `accurev` can be checked without running it.

use std::process::Command;

use crate::core::{
    config::ToolConfig,
    error::{AppError, AppResult},
    runner::{CommandOutput, capture_command, capture_command_with_input, execute_command},
};

/// Options of `accurev hist`. XML output (`-fx`) is always requested.
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    pub depot: Option<String>,
    pub stream: Option<String>,
    pub time_spec: Option<String>,
    pub list_file: Option<String>,
    pub list_file_xml: bool,
    pub elements: Vec<String>,
    pub all_elements: bool,
    pub element_id: Option<String>,
    pub transaction_kind: Option<String>,
    pub comment: Option<String>,
    pub username: Option<String>,
}

impl HistoryQuery {
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["hist".to_string()];
        push_opt(&mut args, "-p", &self.depot);
        push_opt(&mut args, "-s", &self.stream);
        push_opt(&mut args, "-t", &self.time_spec);
        if let Some(list_file) = &self.list_file {
            if self.list_file_xml {
                args.push("-Fx".to_string());
            }
            args.extend(["-l".to_string(), list_file.clone()]);
        }
        args.extend(self.elements.iter().cloned());
        if self.all_elements {
            args.push("-a".to_string());
        }
        push_opt(&mut args, "-e", &self.element_id);
        push_opt(&mut args, "-k", &self.transaction_kind);
        push_opt(&mut args, "-c", &self.comment);
        push_opt(&mut args, "-u", &self.username);
        args.push("-fx".to_string());
        args
    }
}

/// The `-f<flags>` switch shared by the `accurev show` subcommands.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowOptions {
    pub xml: bool,
    pub include_deactivated: bool,
    pub include_old_definitions: bool,
    pub kind_column: bool,
    /// Adds `hasDefaultGroup`; implies XML.
    pub has_default_group: bool,
}

impl ShowOptions {
    pub fn xml() -> Self {
        ShowOptions { xml: true, ..Default::default() }
    }

    pub fn format_flag(&self) -> Option<String> {
        let mut flags = String::new();
        if self.include_deactivated && self.include_old_definitions {
            flags.push('I');
        } else if self.include_deactivated {
            flags.push('i');
        }
        if self.kind_column {
            flags.push('v');
        }
        if self.has_default_group {
            flags.push_str("xg");
        } else if self.xml {
            flags.push('x');
        }

        if flags.is_empty() { None } else { Some(format!("-f{}", flags)) }
    }

    fn args(&self, subcommand: &str) -> Vec<String> {
        let mut args = vec!["show".to_string()];
        args.extend(self.format_flag());
        args.push(subcommand.to_string());
        args
    }
}

/// Which part of the stream tree `show streams` lists around `-s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamListing {
    /// `-r`: the stream and everything below it
    PathAndChildren,
    /// `-R`: everything below the stream
    Children,
    /// `-1`: direct children only
    ImmediateChildren,
}

#[derive(Debug, Clone, Default)]
pub struct StreamsQuery {
    pub depot: Option<String>,
    pub time_spec: Option<String>,
    pub stream: Option<String>,
    pub match_type: Option<String>,
    pub list_file: Option<String>,
    pub listing: Option<StreamListing>,
    pub include_deactivated: bool,
    pub include_old_definitions: bool,
}

impl StreamsQuery {
    pub fn args(&self) -> Vec<String> {
        let show = ShowOptions {
            xml: true,
            include_deactivated: self.include_deactivated,
            include_old_definitions: self.include_old_definitions,
            kind_column: false,
            has_default_group: true,
        };

        let mut args = vec!["show".to_string()];
        args.extend(show.format_flag());
        push_opt(&mut args, "-p", &self.depot);
        push_opt(&mut args, "-t", &self.time_spec);
        push_opt(&mut args, "-s", &self.stream);
        push_opt(&mut args, "-m", &self.match_type);
        push_opt(&mut args, "-l", &self.list_file);
        match self.listing {
            Some(StreamListing::PathAndChildren) => args.push("-r".to_string()),
            Some(StreamListing::Children) => args.push("-R".to_string()),
            Some(StreamListing::ImmediateChildren) => args.push("-1".to_string()),
            None => {}
        }
        args.push("streams".to_string());
        args
    }
}

/// Options of `accurev pop`. XML output is always requested.
#[derive(Debug, Clone, Default)]
pub struct PopulateRequest {
    pub recursive: bool,
    pub overwrite: bool,
    pub ver_spec: Option<String>,
    pub location: Option<String>,
    pub dont_build_dir_tree: bool,
    pub time_spec: Option<String>,
    pub list_file: Option<String>,
    pub elements: Vec<String>,
}

impl PopulateRequest {
    pub fn args(&self) -> AppResult<Vec<String>> {
        let mut args = vec!["pop".to_string()];
        if self.overwrite {
            args.push("-O".to_string());
        }
        if self.recursive {
            args.push("-R".to_string());
        }

        match (&self.ver_spec, &self.location) {
            (Some(ver_spec), Some(location)) => {
                args.extend(["-v".to_string(), ver_spec.clone(), "-L".to_string(), location.clone()]);
                if self.dont_build_dir_tree {
                    args.push("-D".to_string());
                }
            }
            (None, None) => {}
            _ => {
                return Err(AppError::Validation(
                    "populate needs both a version spec and a location, or neither".to_string(),
                ));
            }
        }

        push_opt(&mut args, "-t", &self.time_spec);
        args.push("-fx".to_string());

        if let Some(list_file) = &self.list_file {
            args.extend(["-l".to_string(), list_file.clone()]);
        } else {
            args.extend(self.elements.iter().cloned());
        }
        Ok(args)
    }
}

fn push_opt(args: &mut Vec<String>, flag: &str, value: &Option<String>) {
    if let Some(value) = value {
        args.push(flag.to_string());
        args.push(value.clone());
    }
}

fn accurev_command(config: &ToolConfig) -> Command {
    let mut command = Command::new(&config.accurev_bin);
    if let Some(ac_sync) = config.ac_sync {
        command.env("AC_SYNC", ac_sync.as_env_value());
    }
    command
}

/// ### accurev hist
/// Returns the XML response
pub fn accurev_hist(config: &ToolConfig, query: &HistoryQuery) -> AppResult<String> {
    let mut command = accurev_command(config);
    command.args(query.args());
    Ok(execute_command(command)?.stdout)
}

/// ### accurev show users
pub fn accurev_show_users(config: &ToolConfig, options: ShowOptions) -> AppResult<String> {
    let mut command = accurev_command(config);
    command.args(options.args("users"));
    Ok(execute_command(command)?.stdout)
}

/// ### accurev show depots
pub fn accurev_show_depots(config: &ToolConfig, options: ShowOptions) -> AppResult<String> {
    let mut command = accurev_command(config);
    command.args(options.args("depots"));
    Ok(execute_command(command)?.stdout)
}

/// ### accurev show streams
pub fn accurev_show_streams(config: &ToolConfig, query: &StreamsQuery) -> AppResult<String> {
    let mut command = accurev_command(config);
    command.args(query.args());
    Ok(execute_command(command)?.stdout)
}

/// ### accurev pop
/// The exit status is part of the result; a failed populate still
/// carries an XML body describing what went wrong.
pub fn accurev_populate(config: &ToolConfig, request: &PopulateRequest) -> AppResult<CommandOutput> {
    let mut command = accurev_command(config);
    command.args(request.args()?);
    capture_command(command)
}

/// ### accurev login
/// Credentials are written to stdin, never passed as arguments.
pub fn accurev_login(config: &ToolConfig, username: &str, password: &str) -> AppResult<bool> {
    let mut command = accurev_command(config);
    command.arg("login");
    let output = capture_command_with_input(command, &format!("{}\n{}\n", username, password))?;
    Ok(output.success())
}

/// ### accurev logout
pub fn accurev_logout(config: &ToolConfig) -> AppResult<bool> {
    let mut command = accurev_command(config);
    command.arg("logout");
    Ok(capture_command(command)?.success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hist_arguments_follow_option_order() {
        let query = HistoryQuery {
            depot: Some("proj".to_string()),
            time_spec: Some("197177-now.3".to_string()),
            list_file: Some("files.xml".to_string()),
            list_file_xml: true,
            transaction_kind: Some("promote".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.args(),
            vec!["hist", "-p", "proj", "-t", "197177-now.3", "-Fx", "-l", "files.xml", "-k", "promote", "-fx"]
        );
    }

    #[test]
    fn bare_hist_still_asks_for_xml() {
        assert_eq!(HistoryQuery::default().args(), vec!["hist", "-fx"]);
    }

    #[test]
    fn show_flags_are_combined_once() {
        assert_eq!(ShowOptions::default().format_flag(), None);
        assert_eq!(ShowOptions::xml().format_flag().as_deref(), Some("-fx"));

        let options = ShowOptions {
            xml: true,
            include_deactivated: true,
            include_old_definitions: true,
            kind_column: true,
            has_default_group: false,
        };
        assert_eq!(options.format_flag().as_deref(), Some("-fIvx"));
        assert_eq!(options.args("users"), vec!["show", "-fIvx", "users"]);
    }

    #[test]
    fn streams_query_forces_default_group_xml() {
        let query = StreamsQuery {
            depot: Some("proj".to_string()),
            stream: Some("dev".to_string()),
            listing: Some(StreamListing::ImmediateChildren),
            include_deactivated: true,
            ..Default::default()
        };
        assert_eq!(query.args(), vec!["show", "-fixg", "-p", "proj", "-s", "dev", "-1", "streams"]);
    }

    #[test]
    fn populate_requires_version_and_location_together() {
        let request = PopulateRequest {
            ver_spec: Some("stream/1".to_string()),
            ..Default::default()
        };
        assert!(matches!(request.args(), Err(AppError::Validation(_))));

        let request = PopulateRequest {
            recursive: true,
            overwrite: true,
            ver_spec: Some("stream/1".to_string()),
            location: Some("here/we/go".to_string()),
            dont_build_dir_tree: true,
            elements: vec!["/./src".to_string()],
            ..Default::default()
        };
        assert_eq!(
            request.args().unwrap(),
            vec!["pop", "-O", "-R", "-v", "stream/1", "-L", "here/we/go", "-D", "-fx", "/./src"]
        );
    }

    #[test]
    fn list_file_wins_over_elements() {
        let request = PopulateRequest {
            list_file: Some("list.txt".to_string()),
            elements: vec!["ignored".to_string()],
            ..Default::default()
        };
        assert_eq!(request.args().unwrap(), vec!["pop", "-fx", "-l", "list.txt"]);
    }
}
