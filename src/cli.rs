//! Argument handling shared by the `namegate` binary's modes.

use crate::{Gender, NameCount, NameRequest, NamegateError};

/// Build a request from `--once` positional arguments.
///
/// The arguments are `[gender] [usage] [surname]`, each optional:
///
/// - the first is taken as a gender only if it is `f`, `m` or `u`
/// - the next one, if any, is the usage code
/// - a following literal `surname` asks for a random surname
///
/// Unspecified parts keep [`NameRequest::default`] values.
pub fn parse_once_args(number: i64, args: &[String]) -> Result<NameRequest, NamegateError> {
    let mut request = NameRequest {
        number: NameCount::try_from(number)?,
        ..NameRequest::default()
    };

    let mut rest = args.iter().map(|arg| arg.trim().to_lowercase());
    let mut next = rest.next();

    if let Some(gender) = next.as_deref().and_then(|arg| arg.parse::<Gender>().ok()) {
        request.gender = gender;
        next = rest.next();
    }

    if let Some(usage) = next {
        request.usage = Some(usage);
        next = rest.next();
    }

    if next.as_deref() == Some("surname") {
        request.random_surname = true;
    }

    Ok(request)
}

/// Whether an interactive answer means "quit".
pub fn is_exit_command(answer: &str) -> bool {
    matches!(answer, "exit" | "quit" | "q" | "x")
}

/// Whether an interactive answer means "generate".
pub fn is_generate_command(answer: &str) -> bool {
    matches!(answer, "" | "y" | "yes" | "generate")
}
