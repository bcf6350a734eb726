use email_address::EmailAddress;

use crate::errors::ValidationIssue;

/// Returns `true` if the provided string is a syntactically valid email address.
pub fn is_valid_email(value: &str) -> bool {
    EmailAddress::is_valid(value)
}

/// Length in characters after trimming surrounding whitespace.
pub fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

/// Pushes a `validation.length` issue when the trimmed value is shorter than `min`.
pub fn check_min_length(field: &str, label: &str, value: &str, min: usize, issues: &mut Vec<ValidationIssue>) {
    if trimmed_len(value) < min {
        issues.push(ValidationIssue::new(
            field,
            "validation.length",
            format!("{label} can't be less than {min} characters."),
        ));
    }
}

pub fn check_email(field: &str, value: &str, issues: &mut Vec<ValidationIssue>) {
    if !is_valid_email(value.trim()) {
        issues.push(ValidationIssue::new(field, "validation.email", "Invalid email address"));
    }
}

pub fn check_password(password: &str, confirmation: &str, min: usize, issues: &mut Vec<ValidationIssue>) {
    if trimmed_len(password) < min {
        issues.push(ValidationIssue::new(
            "password",
            "validation.length",
            format!("Password must be at least {min} characters long."),
        ));
    }
    if password.trim() != confirmation.trim() {
        issues.push(ValidationIssue::new(
            "password",
            "validation.confirmation",
            "Passwords don't match.",
        ));
    }
}
