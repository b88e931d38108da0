//! Interactive composer: type labels as if they had been signed and watch
//! the word and sentence change.

use sign_compose::{Composer, ComposeLimits, DetectMode, GateTimer, InsertGate, TimerSettings};
use sign_labels::{ControlLabel, Label};
use std::io::{self, Write};

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║              Sign Composition Playground                 ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    println!("  Insert gate:");
    println!("    1. Reopen before every sign (default)");
    println!("    2. Real cooldown timer");
    let timed = read_line("  Choice: ").trim() == "2";

    let gate = InsertGate::new();
    let timer = if timed {
        let settings = TimerSettings::default();
        println!("  ✓  Gate reopens {} ms after each edit.", settings.interval_ms);
        Some(GateTimer::spawn(gate.clone(), settings))
    } else {
        None
    };

    let mut composer = Composer::new(ComposeLimits::default());
    let mut mode = DetectMode::Static;
    println!();

    loop {
        print_ops_menu(mode);
        let choice = read_line("Command: ").trim().to_ascii_lowercase();

        match choice.as_str() {
            "1" => {
                let text = read_line("  Label: ");
                let text = text.trim();
                if text.is_empty() { continue; }
                sign(&mut composer, &gate, timed, mode, text);
            }
            "2" => {
                let line = read_line("  Labels (space separated): ");
                for text in line.split_whitespace() {
                    sign(&mut composer, &gate, timed, mode, text);
                }
            }
            "3" => {
                mode = match mode {
                    DetectMode::Static  => DetectMode::Dynamic,
                    DetectMode::Dynamic => DetectMode::Static,
                };
                println!("  Now composing {:?} signs.", mode);
            }
            "4" => {
                for c in ControlLabel::ALL {
                    println!("    {}", c.name());
                }
            }
            "5" => print_status(&composer, &gate),
            "q" | "quit" => {
                println!("\nGoodbye!\n");
                break;
            }
            _ => println!("  ⚠  Unknown command."),
        }
        println!();
    }

    if let Some(t) = timer { t.stop(); }
}

fn sign(composer: &mut Composer, gate: &InsertGate, timed: bool, mode: DetectMode, text: &str) {
    if !timed { gate.open(); }
    match composer.apply(&Label::from(text), mode, gate) {
        Some(edit) => println!("  ✓  {:<24} {:?}", text, edit),
        None if !gate.is_open() => println!("  ·  {:<24} ignored: gate closed", text),
        None => println!("  ·  {:<24} no change", text),
    }
    print_status(composer, gate);
}

fn print_status(composer: &Composer, gate: &InsertGate) {
    println!("     word     : \"{}\"", composer.word());
    println!("     sentence : \"{}\"", composer.sentence());
    match composer.cursor() {
        Some(i) => println!("     cursor   : word {}", i),
        None    => println!("     cursor   : none"),
    }
    println!("     gate     : {}", if gate.is_open() { "open" } else { "closed" });
}

fn print_ops_menu(mode: DetectMode) {
    println!("  ┌─────────────────────────────────────────────────────────┐");
    println!("  │  1. Sign one label            4. List control labels    │");
    println!("  │  2. Sign several labels       5. Status                 │");
    println!("  │  3. Toggle static / dynamic   q. Quit                   │");
    println!("  └─────────────────────────────────────────────────────────┘");
    println!("  mode: {:?}", mode);
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
