use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::command::CommandRecord;
use crate::session::Session;

pub trait BuiltinCommand {
    fn name(&self) -> &'static str;
    fn run(&self, args: &[String], session: &mut Session);
}

/// Registry of the commands the shell handles without forking.
pub struct BuiltinManager {
    commands: HashMap<&'static str, Box<dyn BuiltinCommand>>,
}

impl BuiltinManager {
    pub fn new() -> Self {
        let mut mgr = BuiltinManager {
            commands: HashMap::new(),
        };
        mgr.register(Box::new(CdCommand));
        mgr.register(Box::new(PwdCommand));
        mgr.register(Box::new(PromptCommand));
        mgr
    }

    pub fn register(&mut self, cmd: Box<dyn BuiltinCommand>) {
        self.commands.insert(cmd.name(), cmd);
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Run the builtin named by the record's first token; the rest of the
    /// span is its argument list.
    pub fn execute(&self, tokens: &[String], record: &CommandRecord, session: &mut Session) {
        let name = record.name(tokens);
        let args = &tokens[record.first + 1..=record.last];
        if let Some(cmd) = self.commands.get(name) {
            cmd.run(args, session);
        }
    }
}

impl Default for BuiltinManager {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CdCommand;

impl BuiltinCommand for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn run(&self, args: &[String], _session: &mut Session) {
        match args {
            [] => go_home(),
            [target] => change_dir(target),
            _ => eprintln!("minish: cd: too many arguments"),
        }
    }
}

fn go_home() {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
    if let Err(e) = std::env::set_current_dir(&home) {
        eprintln!("minish: cd: {}: {}", home.display(), e);
    }
}

fn change_dir(target: &str) {
    if target == ".." || target == "/tmp" {
        if let Err(e) = std::env::set_current_dir(target) {
            eprintln!("minish: cd: {}: {}", target, e);
        }
        return;
    }

    // Inside /home the user name doubles as a shortcut to the home
    // directory.
    if at_home_root() && std::env::var("USER").map_or(false, |user| user == target) {
        go_home();
        return;
    }

    // Anything else must name an entry of the current directory.
    if !in_current_listing(target) {
        eprintln!("minish: cd: {}: No such file or directory", target);
    } else if !Path::new(target).is_dir() {
        eprintln!("minish: cd: {}: Not a directory", target);
    } else if let Err(e) = std::env::set_current_dir(target) {
        eprintln!("minish: cd: {}: {}", target, e);
    }
}

fn at_home_root() -> bool {
    nix::unistd::getcwd().map_or(false, |dir| dir == Path::new("/home"))
}

fn in_current_listing(name: &str) -> bool {
    match std::fs::read_dir(".") {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .any(|entry| entry.file_name().to_string_lossy() == name),
        Err(_) => false,
    }
}

pub struct PwdCommand;

impl BuiltinCommand for PwdCommand {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn run(&self, _args: &[String], _session: &mut Session) {
        match nix::unistd::getcwd() {
            Ok(dir) => println!("{}", dir.display()),
            Err(e) => eprintln!("minish: pwd: {}", e),
        }
    }
}

pub struct PromptCommand;

impl BuiltinCommand for PromptCommand {
    fn name(&self) -> &'static str {
        "prompt"
    }

    fn run(&self, args: &[String], session: &mut Session) {
        match args {
            [new_prompt] => session.prompt = new_prompt.clone(),
            [] => eprintln!("minish: prompt: missing argument"),
            _ => eprintln!("minish: prompt: too many arguments"),
        }
    }
}
