use inquire::Confirm;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PromptError {
    #[error("Error occurred trying to prompt user")]
    #[diagnostic(code(temelie::prompt::confirm))]
    Confirm(#[from] inquire::InquireError),
}

/// Asks whether the previewed tree should actually be written.
pub fn confirm_apply() -> Result<bool, PromptError> {
    let answer = Confirm::new("Write the previewed tree?")
        .with_default(false)
        .with_help_message("Nothing has been written yet")
        .prompt()?;

    Ok(answer)
}
