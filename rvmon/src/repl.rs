//! Interactive command loop of the monitor.
//!
//! Commands are dispatched on the first word of the line through a
//! fixed table; the rest of the line is handed to the handler as its
//! argument string.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use rvmon_machine::{EmuState, Word};
use rvmon_sdb::{Debugger, WatchHit};

use crate::error::Result;
use crate::selftest;

/// What the dispatcher should do after a command ran.
enum Flow {
    Continue,
    Quit,
}

struct Command {
    name: &'static str,
    alias: Option<&'static str>,
    usage: &'static str,
    summary: &'static str,
    run: fn(&mut Repl, &str) -> Flow,
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        alias: None,
        usage: "help [CMD]",
        summary: "Display information about the supported commands",
        run: cmd_help,
    },
    Command {
        name: "c",
        alias: None,
        usage: "c",
        summary: "Continue execution of the guest program",
        run: cmd_continue,
    },
    Command {
        name: "si",
        alias: None,
        usage: "si [N]",
        summary: "Step the guest by N instructions (default 1)",
        run: cmd_step,
    },
    Command {
        name: "info",
        alias: None,
        usage: "info r | info w",
        summary: "Print register state or armed watchpoints",
        run: cmd_info,
    },
    Command {
        name: "x",
        alias: None,
        usage: "x N ADDR",
        summary: "Scan N words of guest memory starting at hex ADDR",
        run: cmd_scan,
    },
    Command {
        name: "p",
        alias: None,
        usage: "p EXPR",
        summary: "Evaluate an expression",
        run: cmd_print,
    },
    Command {
        name: "w",
        alias: None,
        usage: "w EXPR",
        summary: "Arm a watchpoint on an expression",
        run: cmd_watch,
    },
    Command {
        name: "d",
        alias: None,
        usage: "d N",
        summary: "Delete watchpoint N",
        run: cmd_delete,
    },
    Command {
        name: "t",
        alias: None,
        usage: "t [N]",
        summary: "Generate and evaluate N random expressions",
        run: cmd_selftest,
    },
    Command {
        name: "q",
        alias: Some("quit"),
        usage: "q | quit",
        summary: "Quit the monitor",
        run: cmd_quit,
    },
];

/// Looks a command up by its name or alias.
fn find_command(name: &str) -> Option<&'static Command> {
    COMMANDS
        .iter()
        .find(|c| c.name == name || c.alias == Some(name))
}

/// The interactive monitor shell.
pub struct Repl {
    dbg: Debugger,
    prompt: String,
}

impl Repl {
    pub fn new(dbg: Debugger, prompt: String) -> Self {
        Self { dbg, prompt }
    }

    /// Reads and dispatches commands until quit or end of input.
    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;
        loop {
            match editor.readline(&self.prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(line);
                    if matches!(self.dispatch(line), Flow::Quit) {
                        return Ok(());
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(()),
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn dispatch(&mut self, line: &str) -> Flow {
        let (name, args) = split_command(line);
        match find_command(name) {
            Some(command) => (command.run)(self, args),
            None => {
                println!("Unknown command '{name}'");
                Flow::Continue
            }
        }
    }

    fn report_hits(&self, hits: &[WatchHit]) {
        for hit in hits {
            println!("Watchpoint {}: {}", hit.id, hit.expr);
            println!("Old value: {}", hit.old);
            println!("New value: {}", hit.new);
        }
    }

    fn report_state(&self) {
        if let EmuState::End { pc, code } = self.dbg.machine().state {
            println!("Guest program ended with code {code} at pc {pc:#010x}");
        }
    }
}

/// Splits a command line into its command word and argument string.
fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (line, ""),
    }
}

/// Parses the `x` command's arguments: a word count and a hex address
/// with or without a `0x` prefix.
fn parse_scan_args(args: &str) -> Option<(usize, Word)> {
    let mut parts = args.split_whitespace();
    let n = parts.next()?.parse().ok()?;
    let addr = parts.next()?;
    let addr = addr.strip_prefix("0x").or_else(|| addr.strip_prefix("0X")).unwrap_or(addr);
    let addr = Word::from_str_radix(addr, 16).ok()?;
    parts.next().is_none().then_some((n, addr))
}

fn cmd_help(_repl: &mut Repl, args: &str) -> Flow {
    if args.is_empty() {
        for command in COMMANDS {
            println!("{:<14} {}", command.usage, command.summary);
        }
    } else {
        match find_command(args) {
            Some(command) => println!("{:<14} {}", command.usage, command.summary),
            None => println!("Unknown command '{args}'"),
        }
    }
    Flow::Continue
}

fn cmd_continue(repl: &mut Repl, _args: &str) -> Flow {
    let hits = repl.dbg.exec(u64::MAX);
    repl.report_hits(&hits);
    repl.report_state();
    Flow::Continue
}

fn cmd_step(repl: &mut Repl, args: &str) -> Flow {
    let n = if args.is_empty() {
        1
    } else {
        match args.parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => {
                println!("Invalid step count '{args}'");
                return Flow::Continue;
            }
        }
    };
    let hits = repl.dbg.exec(n);
    repl.report_hits(&hits);
    repl.report_state();
    Flow::Continue
}

fn cmd_info(repl: &mut Repl, args: &str) -> Flow {
    match args {
        "r" => {
            for (name, value) in repl.dbg.machine().cpu.regs() {
                println!("{name:<5} {value:#010x}  {value}");
            }
        }
        "w" => {
            if repl.dbg.watchpoints().next().is_none() {
                println!("No watchpoints");
            }
            for wp in repl.dbg.watchpoints() {
                println!("Watchpoint {}: {}", wp.id(), wp.expr());
            }
        }
        _ => println!("Usage: info r | info w"),
    }
    Flow::Continue
}

fn cmd_scan(repl: &mut Repl, args: &str) -> Flow {
    let Some((n, base)) = parse_scan_args(args) else {
        println!("Usage: x N ADDR");
        return Flow::Continue;
    };
    for i in 0..n {
        let addr = base.wrapping_add(4 * i as Word);
        match repl.dbg.machine().read_phys(addr, 4) {
            Some(value) => println!("{addr:#010x}: {value:#010x}"),
            None => {
                println!("address {addr:#010x} is not mapped");
                break;
            }
        }
    }
    Flow::Continue
}

fn cmd_print(repl: &mut Repl, args: &str) -> Flow {
    match repl.dbg.eval(args) {
        Ok(value) => println!("{value:#x}\t{value}"),
        Err(err) => println!("Invalid expression: {err}"),
    }
    Flow::Continue
}

fn cmd_watch(repl: &mut Repl, args: &str) -> Flow {
    match repl.dbg.add_watchpoint(args) {
        Ok(id) => println!("Watchpoint {id}: {args}"),
        Err(err) => println!("Invalid expression: {err}"),
    }
    Flow::Continue
}

fn cmd_delete(repl: &mut Repl, args: &str) -> Flow {
    match args.parse::<usize>() {
        Ok(id) => match repl.dbg.delete_watchpoint(id) {
            Ok(()) => println!("Watchpoint {id} deleted"),
            Err(err) => println!("{err}"),
        },
        Err(_) => println!("Usage: d N"),
    }
    Flow::Continue
}

fn cmd_selftest(repl: &mut Repl, args: &str) -> Flow {
    let count = if args.is_empty() {
        1
    } else {
        match args.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                println!("Invalid count '{args}', using 1");
                1
            }
        }
    };
    for i in 1..=count {
        let expr = selftest::random_expr();
        println!("Expression {i}: {expr}");
        match repl.dbg.eval(&expr) {
            Ok(value) => println!("Result: {value} ({value:#x})"),
            Err(err) => println!("Evaluation failed: {err}"),
        }
    }
    Flow::Continue
}

fn cmd_quit(repl: &mut Repl, _args: &str) -> Flow {
    repl.dbg.machine_mut().state = EmuState::Quit;
    Flow::Quit
}
