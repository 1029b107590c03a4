// subcc: SubC front end with symbol table and intermediate-code browser

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as CliParser;
use crossterm::{
    execute,
    style::Stylize,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use subcc::icode::printer;
use subcc::parser::{parse_source, CompilationUnit};
use subcc::symtab::xref;
use subcc::ui::App;

/// Parse a SubC source file and report its syntax errors
#[derive(CliParser, Debug)]
#[command(name = "subcc", version, about)]
struct Cli {
    /// SubC source file
    file: PathBuf,

    /// Print the symbol table cross-reference listing
    #[arg(long)]
    xref: bool,

    /// Print the intermediate code of every routine
    #[arg(long)]
    icode: bool,

    /// Browse the result in the terminal UI
    #[arg(long)]
    tui: bool,
}

fn report(unit: &CompilationUnit) {
    for error in &unit.errors {
        let location = format!("{}:{}", error.location.line, error.location.column);
        let at = if error.token_text.is_empty() {
            String::new()
        } else {
            format!("  [at '{}']", error.token_text)
        };
        eprintln!("{}  {}{}", location.dark_grey(), error.kind.message().red(), at);
    }

    let summary = &unit.summary;
    eprintln!(
        "{} source lines. {} syntax errors. {:.2} seconds total parsing time.",
        summary.line_count,
        summary.error_count,
        summary.elapsed.as_secs_f64()
    );
}

fn run_tui(unit: CompilationUnit, source: String) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(unit, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", cli.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    eprintln!("Parsing {}...", cli.file.display());
    let unit = match parse_source(&source) {
        Ok(unit) => unit,
        Err(e) => {
            eprintln!("{} {}", "*** FATAL ERROR:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    report(&unit);

    if cli.xref {
        println!("\n{}", "===== CROSS-REFERENCE TABLE =====".bold());
        for line in xref::listing(&unit.symtab) {
            println!("{}", line);
        }
    }

    if cli.icode {
        println!("\n{}", "===== INTERMEDIATE CODE =====".bold());
        for line in printer::print_routines(&unit.symtab) {
            println!("{}", line);
        }
    }

    let failed = unit.error_count() > 0;

    if cli.tui {
        if let Err(err) = run_tui(unit, source) {
            eprintln!("Error: {:?}", err);
            return ExitCode::FAILURE;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
