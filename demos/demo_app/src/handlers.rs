use std::sync::OnceLock;
use std::time::Instant;

static STARTED: OnceLock<Instant> = OnceLock::new();

pub fn mark_start() {
    STARTED.get_or_init(Instant::now);
}

pub fn echo(msg: &str) {
    println!("{msg}");
}

pub fn add(a: i32, b: i32) {
    match a.checked_add(b) {
        Some(sum) => println!("{a} + {b} = {sum}"),
        None => println!("{a} + {b} overflows i32"),
    }
}

pub fn scale(value: f64, factor: f32) {
    println!("{value} * {factor} = {}", value * f64::from(factor));
}

pub fn led(on: bool) {
    if on {
        println!("led | ON");
    } else {
        println!("led | OFF");
    }
}

pub fn peek(addr: u32, len: u8) {
    println!("peek | addr: {addr:#010x}, len: {len}");
}

pub fn uptime() {
    let secs = STARTED.get().map(|t| t.elapsed().as_secs_f64()).unwrap_or(0.0);
    println!("uptime | {secs:.3}s");
}
