//! Just enough command-line grammar to find the positional target argument
//! of `ssh` and container CLIs.
//!
//! Two dialects are covered:
//! - [`getopt`]: POSIX short options, non-permuting (stops at the first
//!   positional argument), as used by the OpenSSH client.
//! - [`FlagGrammar`]: lenient long/short flag scanning for container
//!   subcommands. Unknown flags are skipped rather than rejected.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetoptError {
    #[error("option -{0} not recognized")]
    UnknownOption(char),

    #[error("option -{0} requires an argument")]
    MissingArgument(char),

    #[error("option {0} not recognized")]
    UnknownLongOption(String),
}

/// Options parsed by [`getopt`] plus the untouched remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<'a> {
    pub options: Vec<(char, Option<&'a str>)>,
    pub operands: &'a [String],
}

/// Parse `args` (program name already stripped) against a getopt-style
/// `optstring` where a letter followed by `:` takes an argument.
///
/// Parsing stops at the first argument that does not start with `-`, at a
/// lone `-`, or after `--`. No long options are accepted.
pub fn getopt<'a>(args: &'a [String], optstring: &str) -> Result<Parsed<'a>, GetoptError> {
    let mut options = Vec::new();
    let mut rest = args;

    while let Some((first, tail)) = rest.split_first() {
        if first == "--" {
            rest = tail;
            break;
        }
        if !first.starts_with('-') || first == "-" {
            break;
        }
        if first.starts_with("--") {
            return Err(GetoptError::UnknownLongOption(first.clone()));
        }
        rest = tail;

        let cluster = &first[1..];
        for (idx, opt) in cluster.char_indices() {
            if !takes_argument(optstring, opt)? {
                options.push((opt, None));
                continue;
            }
            let attached = &cluster[idx + opt.len_utf8()..];
            if !attached.is_empty() {
                options.push((opt, Some(attached)));
            } else {
                let (value, tail) = rest
                    .split_first()
                    .ok_or(GetoptError::MissingArgument(opt))?;
                options.push((opt, Some(value.as_str())));
                rest = tail;
            }
            break;
        }
    }

    Ok(Parsed {
        options,
        operands: rest,
    })
}

fn takes_argument(optstring: &str, opt: char) -> Result<bool, GetoptError> {
    if opt == ':' {
        return Err(GetoptError::UnknownOption(opt));
    }
    let idx = optstring
        .find(opt)
        .ok_or(GetoptError::UnknownOption(opt))?;
    Ok(optstring[idx + opt.len_utf8()..].starts_with(':'))
}

/// Flag vocabulary of one subcommand. Flags are spelled in full (`-i`,
/// `--interactive`); both spellings of the same flag are listed separately.
#[derive(Debug, Clone, Copy)]
pub struct FlagGrammar {
    /// Flags that stand alone.
    pub switches: &'static [&'static str],
    /// Flags that consume a value (`--user root`, `--user=root`, `-uroot`).
    pub valued: &'static [&'static str],
}

impl FlagGrammar {
    /// First argument that is neither a flag nor a flag's value.
    ///
    /// Unrecognized flags are skipped on their own; their would-be values are
    /// treated as positionals, so a stray token can win.
    pub fn first_positional<'a>(&self, args: &'a [String]) -> Option<&'a str> {
        let mut iter = args.iter();
        while let Some(token) = iter.next() {
            if token == "--" {
                return iter.next().map(String::as_str);
            }
            if token.starts_with("--") {
                if !token.contains('=') && self.valued.contains(&token.as_str()) {
                    iter.next();
                }
                continue;
            }
            if token.len() > 1 && token.starts_with('-') {
                if self.short_cluster_wants_value(&token[1..]) {
                    iter.next();
                }
                continue;
            }
            return Some(token.as_str());
        }
        None
    }

    /// Whether a cluster like `it` or `u` ends in a valued flag with its
    /// value still to come in the next argument.
    fn short_cluster_wants_value(&self, cluster: &str) -> bool {
        for (idx, letter) in cluster.char_indices() {
            let flag = format!("-{letter}");
            if self.valued.contains(&flag.as_str()) {
                return idx + letter.len_utf8() == cluster.len();
            }
        }
        false
    }
}
