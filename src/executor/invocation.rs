//! Structured invocation descriptors
//!
//! An [`Invocation`] is the program plus its full argument vector. Operator data only
//! enters one as a separate argv element (script-file style) or inside a [`PsScript`]
//! where it has already been escaped (command and dot-source styles).

use std::path::Path;
use std::time::Duration;

use crate::config::InterpreterConfig;
use crate::escape::{PsLiteral, PsScript};
use crate::form::NormalizedForm;

/// Program, arguments and optional time bound for one child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
}

impl Invocation {
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Short description for diagnostics. Arguments are counted, not printed, since a
    /// prelude can carry an API key.
    pub fn describe(&self) -> String {
        format!("{} ({} args)", self.program, self.args.len())
    }
}

/// The external interpreter and its fixed flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    config: InterpreterConfig,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self { config }
    }

    pub fn program(&self) -> &str {
        &self.config.program
    }

    fn base(&self) -> Invocation {
        Invocation {
            program: self.config.program.clone(),
            args: self.config.flags.clone(),
            timeout: None,
        }
    }

    /// Run `script` as an inline command.
    pub fn command(&self, script: &PsScript) -> Invocation {
        let mut inv = self.base();
        inv.args.push(self.config.command_flag.clone());
        inv.args.push(script.to_string());
        inv
    }

    /// Load the script's definitions, apply `prelude`, then call `function`.
    ///
    /// `function` is a fixed identifier from the action table, never operator input.
    pub fn dot_source(&self, script_path: &Path, function: &'static str, prelude: &PsScript) -> Invocation {
        self.command(&dot_source_script(script_path, function, prelude))
    }

    /// Run the script file itself with `args`.
    pub fn script_file(&self, script_path: &Path, args: &ScriptArgs) -> Invocation {
        let mut inv = self.base();
        if let Some(flag) = &self.config.file_flag {
            inv.args.push(flag.clone());
        }
        inv.args.push(script_path.to_string_lossy().into_owned());
        inv.args.extend(args.to_args());
        inv
    }
}

/// `. '<path>'; $ErrorActionPreference='Stop'; <prelude> <function>`
pub(crate) fn dot_source_script(
    script_path: &Path,
    function: &'static str,
    prelude: &PsScript,
) -> PsScript {
    let path = PsLiteral::new(&script_path.to_string_lossy());
    let mut script = PsScript::new();
    script
        .code(". ")
        .literal(&path)
        .line("; $ErrorActionPreference='Stop';")
        .append(prelude);
    if !prelude.is_blank() && !prelude.as_str().ends_with('\n') {
        script.line("");
    }
    script.line(function);
    script
}

/// Named argument list for the script-file entry style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptArgs {
    pairs: Vec<(&'static str, String)>,
}

impl ScriptArgs {
    /// The fixed argument list, ending with `-Action <action>`.
    pub fn from_form(form: &NormalizedForm, action: &'static str) -> Self {
        let pairs = vec![
            ("-SalesOrder", form.sales_order.clone()),
            ("-SDMName", form.sdm_name.clone()),
            ("-CustomerName", form.customer_name.clone()),
            ("-ShortDesc", form.short_description.clone()),
            ("-Prod", ps_bool_arg(form.production)),
            ("-DRaaS", ps_bool_arg(form.draas)),
            ("-BaaS", ps_bool_arg(form.baas)),
            ("-CopySEDT", ps_bool_arg(form.copy_sedt)),
            ("-TeamsEmails", form.emails().join(",")),
            ("-TeamsRoles", form.roles().join(",")),
            ("-Action", action.to_string()),
        ];
        Self { pairs }
    }

    /// One `-Name:value` token per parameter, so a value starting with `-` is never
    /// read as a parameter name by the script's binder.
    pub fn to_args(&self) -> Vec<String> {
        self.pairs
            .iter()
            .map(|(name, value)| format!("{}:{}", name, value))
            .collect()
    }
}

fn ps_bool_arg(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}
