//! Interactive REPL for the SearchScape MCP server.
//!
//! Launch with `searchscape-mcp repl` to enter interactive mode.
//! Type `/help` for available commands, Tab for completion.

use std::sync::Arc;

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use serde_json::json;
use tokio::runtime::Handle;
use tokio::sync::Mutex;

use searchscape::Filter;

use crate::config::ServerConfig;
use crate::session::ImageSessionManager;
use crate::tools::{fetch_image, transform_image, ToolRegistry};
use crate::types::ToolCallResult;

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/fetch", "Fetch an image: /fetch <user> <prompt>"),
    ("/transform", "Transform the user's image: /transform <user> <filter>"),
    ("/sessions", "List users with a fetched image"),
    ("/tools", "List available MCP tools"),
    ("/info", "Show server and provider settings"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// REPL helper for tab completion.
#[derive(Default)]
struct SearchScapeHelper;

impl Completer for SearchScapeHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        // Filter-name completion for the third word of /transform.
        let words: Vec<&str> = input.split(' ').collect();
        if words.len() == 3 && words[0] == "/transform" {
            let partial = words[2];
            let prefix_start = input.len() - partial.len();
            let matches: Vec<Pair> = Filter::ALL
                .iter()
                .map(|f| f.name())
                .filter(|name| name.starts_with(partial))
                .map(|name| Pair {
                    display: name.to_string(),
                    replacement: name.to_string(),
                })
                .collect();
            return Ok((prefix_start, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for SearchScapeHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .map(|(cmd, _)| *cmd)
            .find(|cmd| cmd.len() > line.len() && cmd.starts_with(line))
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Highlighter for SearchScapeHelper {}
impl Validator for SearchScapeHelper {}
impl Helper for SearchScapeHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Session state: the same manager the server would use, driven from the prompt.
struct ReplState {
    session: Arc<Mutex<ImageSessionManager>>,
    config: ServerConfig,
    runtime: Handle,
}

/// Run the interactive REPL. Must be called off the async runtime's worker
/// threads (e.g. from `spawn_blocking`), since tool calls block on `runtime`.
pub fn run(config: &ServerConfig, runtime: Handle) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1msearchscape-mcp v{}\x1b[0m \x1b[90m\u{2014} Image search and transforms for AI agents\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let rl_config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<SearchScapeHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(rl_config)?;
    rl.set_helper(Some(SearchScapeHelper));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".searchscape_mcp_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let state = ReplState {
        session: Arc::new(Mutex::new(ImageSessionManager::new(config))),
        config: config.clone(),
        runtime,
    };
    let prompt = " \x1b[36msearchscape>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let mut parts = input.splitn(2, ' ');
                let cmd = parts.next().unwrap_or("");
                let args = parts.next().unwrap_or("").trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => cmd_info(&state),
                    "tools" => cmd_tools(),
                    "fetch" => cmd_fetch(args, &state),
                    "transform" => cmd_transform(args, &state),
                    "sessions" => cmd_sessions(&state),
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);

    Ok(())
}

/// Split `<user> <rest...>`; both parts must be present.
fn split_user_args(args: &str) -> Option<(&str, &str)> {
    let (user, rest) = args.split_once(' ')?;
    let rest = rest.trim();
    if user.is_empty() || rest.is_empty() {
        return None;
    }
    Some((user, rest))
}

fn print_result(result: &ToolCallResult) {
    eprintln!();
    if result.is_error() {
        eprintln!("  \x1b[31m{}\x1b[0m", result.joined_text());
    } else {
        eprintln!("  {}", result.joined_text());
    }
    eprintln!();
}

fn call_tool(name: &str, arguments: serde_json::Value, state: &ReplState) {
    let outcome = state.runtime.block_on(ToolRegistry::call(
        name,
        Some(arguments),
        &state.session,
    ));
    match outcome {
        Ok(result) => print_result(&result),
        Err(e) => eprintln!("  Error: {e}"),
    }
}

fn cmd_fetch(args: &str, state: &ReplState) {
    let Some((user, prompt)) = split_user_args(args) else {
        eprintln!("  Usage: /fetch <user> <prompt>");
        return;
    };
    call_tool(
        fetch_image::NAME,
        json!({ "userId": user, "prompt": prompt }),
        state,
    );
}

fn cmd_transform(args: &str, state: &ReplState) {
    let Some((user, filter)) = split_user_args(args) else {
        eprintln!("  Usage: /transform <user> <{}>", Filter::choices());
        return;
    };
    call_tool(
        transform_image::NAME,
        json!({ "userId": user, "filter": filter }),
        state,
    );
}

fn cmd_sessions(state: &ReplState) {
    let session = state.runtime.block_on(state.session.lock());
    let store = session.store();
    eprintln!();
    if store.is_empty() {
        eprintln!("  No images fetched yet. Try /fetch <user> <prompt>.");
    } else {
        eprintln!("  {} session(s):", store.len());
        for user in store.session_ids() {
            eprintln!("    {:<20} {}", user, store.get(user).unwrap_or(""));
        }
    }
    eprintln!();
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: Tab completes commands and /transform filter names.");
    eprintln!();
}

fn cmd_info(state: &ReplState) {
    let init = crate::types::InitializeResult::default_result();
    let missing = state.config.missing_keys();
    eprintln!();
    eprintln!("  Server:     {} v{}", init.server_info.name, init.server_info.version);
    eprintln!("  Protocol:   {}", init.protocol_version);
    eprintln!("  Search:     {}", state.config.unsplash_url);
    eprintln!("  Inference:  {}", state.config.hf_url);
    eprintln!("  Timeout:    {}s", state.config.timeout.as_secs());
    if missing.is_empty() {
        eprintln!("  Keys:       configured");
    } else {
        eprintln!("  \x1b[33mMissing:\x1b[0m    {}", missing.join(", "));
    }
    eprintln!();
}

fn cmd_tools() {
    let tools = ToolRegistry::list_tools();
    eprintln!();
    eprintln!("  {} MCP tools available:", tools.len());
    eprintln!();
    for tool in &tools {
        eprintln!(
            "    {:<28} {}",
            tool.name,
            tool.description.as_deref().unwrap_or("")
        );
    }
    eprintln!();
}
