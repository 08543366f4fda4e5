//! Console styling.

use colored::Colorize;

/// Print the startup banner. `color` comes from `logging.color_enabled`.
pub(crate) fn print_banner(color: bool) {
    let version = plasma_server::VERSION;
    let art = format!(
        r"
   ___  __
  / _ \/ /__ ____ __ _  ___ _
 / ___/ / _ `(_-</  ' \/ _ `/
/_/  /_/\_,_/___/_/_/_/\_,_/
                          v{version}
"
    );
    if color {
        println!("{}", art.cyan());
        println!("{}", "Extensible host process".dimmed());
    } else {
        println!("{art}");
        println!("Extensible host process");
    }
    println!();
}

/// Format an error line.
pub(crate) fn error(text: &str, color: bool) -> String {
    if color {
        format!("{} {}", "✗".red(), text.red())
    } else {
        format!("error: {text}")
    }
}

/// Format a success line.
pub(crate) fn success(text: &str, color: bool) -> String {
    if color {
        format!("{} {}", "✓".green(), text)
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_has_no_escape_codes() {
        assert_eq!(error("boom", false), "error: boom");
        assert_eq!(success("done", false), "done");
    }
}
