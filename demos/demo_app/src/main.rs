mod handlers;
mod logger;

use std::io::{self, BufRead, Write};

use console_config::{INPUT_BUF_SIZE, STREAM_INPUT_CAPACITY, STREAM_OUTPUT_CAPACITY};
use console_core::{BufferedStream, Console, Outcome};
use console_macros::define_commands;

define_commands! {
    mod commands;
    path = "src/commands.cfg"
}

type Stream = BufferedStream<STREAM_INPUT_CAPACITY, STREAM_OUTPUT_CAPACITY>;

/// Copy whatever the console wrote to stdout.
fn flush_output(console: &mut Console<'static, Stream, INPUT_BUF_SIZE>) {
    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout
        .write_all(console.stream().output().as_bytes())
        .and_then(|()| stdout.flush())
    {
        log::warn!("stdout: {e}");
    }
    console.stream_mut().clear_output();
}

fn main() {
    if let Err(e) = logger::init() {
        eprintln!("logger not installed: {e}");
    }
    handlers::mark_start();

    let mut console: Console<'static, Stream, INPUT_BUF_SIZE> =
        Console::new(Stream::new(), commands::table());

    println!(
        "{} commands registered. Type 'help' to list them, Ctrl-D to exit.",
        commands::NUM_COMMANDS
    );

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("stdin: {e}");
                break;
            }
        };

        let stream = console.stream_mut();
        if stream.feed(line.as_bytes()) < line.len() || stream.feed(b"\n") == 0 {
            log::warn!("line did not fit in the input queue");
        }

        // Drain every queued line; each call handles at most one.
        while console.stream().pending() > 0 {
            let outcome = console.handle_input().ok();
            flush_output(&mut console);
            if let Some(Outcome::Executed { command }) = outcome {
                log::info!("{command} ok");
            }
        }
    }
    println!("Console exited...");
}
