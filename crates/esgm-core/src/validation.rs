//! Request validation and normalization.
//!
//! Every function returns the normalized payload the store should persist,
//! or an [`Error::Validation`] whose message is shown to the user as-is.

use crate::types::{AnswerSubmission, CreateProjectRequest, LoginRequest, RegisterRequest};
use crate::{Error, Result};

/// Maximum length of a first or last name, in characters.
pub const MAX_NAME_LEN: usize = 50;
/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;
/// Maximum project name length, in characters.
pub const MAX_PROJECT_NAME_LEN: usize = 255;
/// Maximum industry label length, in characters.
pub const MAX_INDUSTRY_LEN: usize = 100;

/// A registration that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Trimmed given name
    pub first_name: String,
    /// Trimmed family name
    pub last_name: String,
    /// Trimmed, lowercased email
    pub email: String,
    /// Password, untouched
    pub password: String,
}

/// Login credentials that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Trimmed, lowercased email
    pub email: String,
    /// Password, untouched
    pub password: String,
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let last = domain.len().saturating_sub(1);
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < last)
}

/// Trim and lowercase an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn required_name(field: &str, label: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation_field(field, format!("{label} is required")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(Error::validation_field(
            field,
            format!("{label} must be less than {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

fn checked_email(value: &str) -> Result<String> {
    let email = normalize_email(value);
    if !is_valid_email(&email) {
        return Err(Error::validation_field(
            "email",
            "Please provide a valid email",
        ));
    }
    Ok(email)
}

/// Validate a registration request.
pub fn validate_registration(req: &RegisterRequest) -> Result<NewUser> {
    let first_name = required_name("firstName", "First name", &req.first_name)?;
    let last_name = required_name("lastName", "Last name", &req.last_name)?;
    let email = checked_email(&req.email)?;

    let password = &req.password;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::validation_field(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
        ));
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(Error::validation_field(
            "password",
            "Password must contain at least one uppercase letter, one lowercase letter, and one number",
        ));
    }

    Ok(NewUser {
        first_name,
        last_name,
        email,
        password: password.clone(),
    })
}

/// Validate a login request.
pub fn validate_login(req: &LoginRequest) -> Result<Credentials> {
    let email = checked_email(&req.email)?;
    if req.password.is_empty() {
        return Err(Error::validation_field("password", "Password is required"));
    }
    Ok(Credentials {
        email,
        password: req.password.clone(),
    })
}

/// Validate and normalize a project submission.
///
/// Whether each `issue_id` refers to an existing key issue is a store
/// question and is checked by the caller.
pub fn validate_project(req: &CreateProjectRequest) -> Result<CreateProjectRequest> {
    let project_name = req.project_name.trim();
    if project_name.is_empty() {
        return Err(Error::validation_field(
            "project_name",
            "Project name is required",
        ));
    }
    if project_name.chars().count() > MAX_PROJECT_NAME_LEN {
        return Err(Error::validation_field(
            "project_name",
            format!("Project name must be less than {MAX_PROJECT_NAME_LEN} characters"),
        ));
    }

    let industry = req.industry.trim();
    if industry.is_empty() {
        return Err(Error::validation_field("industry", "Industry is required"));
    }
    if industry.chars().count() > MAX_INDUSTRY_LEN {
        return Err(Error::validation_field(
            "industry",
            format!("Industry must be less than {MAX_INDUSTRY_LEN} characters"),
        ));
    }

    if let Some(revenue) = req.annual_revenue
        && (!revenue.is_finite() || revenue < 0.0)
    {
        return Err(Error::validation_field(
            "annual_revenue",
            "Annual revenue must be a non-negative number",
        ));
    }

    if req.project_data.is_empty() {
        return Err(Error::validation_field(
            "project_data",
            "Project data is required",
        ));
    }

    let mut project_data = Vec::with_capacity(req.project_data.len());
    for item in &req.project_data {
        if item.issue_id <= 0 || item.value.trim().is_empty() {
            return Err(Error::validation_field(
                "project_data",
                "Each project data item must have issue_id and non-empty value",
            ));
        }
        project_data.push(AnswerSubmission::new(item.issue_id, item.value.trim()));
    }

    let description = req
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Ok(CreateProjectRequest {
        project_name: project_name.to_string(),
        industry: industry.to_string(),
        annual_revenue: req.annual_revenue,
        description,
        project_data,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn registration() -> RegisterRequest {
        RegisterRequest {
            first_name: "  Ada ".to_string(),
            last_name: "Lovelace".to_string(),
            email: " Ada@Example.COM ".to_string(),
            password: "Analytical1".to_string(),
        }
    }

    fn project() -> CreateProjectRequest {
        CreateProjectRequest {
            project_name: " Solar Farm ".to_string(),
            industry: "Energy".to_string(),
            annual_revenue: Some(250.0),
            description: Some("   ".to_string()),
            project_data: vec![AnswerSubmission::new(1, " 1200 ")],
        }
    }

    fn message(err: Error) -> String {
        err.to_string()
    }

    // ------------------------------------------------------------------------
    // email
    // ------------------------------------------------------------------------

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@com."));
        assert!(!is_valid_email("a@localhost"));
        assert!(!is_valid_email("a b@example.com"));
    }

    // ------------------------------------------------------------------------
    // registration
    // ------------------------------------------------------------------------

    #[test]
    fn test_registration_normalizes() {
        let user = validate_registration(&registration()).unwrap();
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.password, "Analytical1");
    }

    #[test]
    fn test_registration_requires_names() {
        let mut req = registration();
        req.first_name = "   ".to_string();
        assert_eq!(
            message(validate_registration(&req).unwrap_err()),
            "First name is required"
        );

        let mut req = registration();
        req.last_name = "x".repeat(51);
        assert_eq!(
            message(validate_registration(&req).unwrap_err()),
            "Last name must be less than 50 characters"
        );
    }

    #[test]
    fn test_registration_name_at_limit_is_accepted() {
        let mut req = registration();
        req.first_name = "é".repeat(50);
        assert!(validate_registration(&req).is_ok());
    }

    #[test]
    fn test_registration_rejects_bad_email() {
        let mut req = registration();
        req.email = "not-an-email".to_string();
        assert_eq!(
            message(validate_registration(&req).unwrap_err()),
            "Please provide a valid email"
        );
    }

    #[test]
    fn test_registration_password_rules() {
        let mut req = registration();
        req.password = "Ab1".to_string();
        assert_eq!(
            message(validate_registration(&req).unwrap_err()),
            "Password must be at least 8 characters long"
        );

        req.password = "alllowercase1".to_string();
        assert!(
            message(validate_registration(&req).unwrap_err()).contains("one uppercase letter")
        );

        req.password = "NoDigitsHere".to_string();
        assert!(validate_registration(&req).is_err());
    }

    // ------------------------------------------------------------------------
    // login
    // ------------------------------------------------------------------------

    #[test]
    fn test_login_requires_password() {
        let req = LoginRequest {
            email: "ada@example.com".to_string(),
            password: String::new(),
        };
        assert_eq!(
            message(validate_login(&req).unwrap_err()),
            "Password is required"
        );
    }

    #[test]
    fn test_login_normalizes_email() {
        let req = LoginRequest {
            email: "ADA@example.com ".to_string(),
            password: "whatever".to_string(),
        };
        assert_eq!(validate_login(&req).unwrap().email, "ada@example.com");
    }

    // ------------------------------------------------------------------------
    // project
    // ------------------------------------------------------------------------

    #[test]
    fn test_project_normalizes() {
        let clean = validate_project(&project()).unwrap();
        assert_eq!(clean.project_name, "Solar Farm");
        assert_eq!(clean.description, None);
        assert_eq!(clean.project_data[0].value, "1200");
    }

    #[test]
    fn test_project_requires_name_and_industry() {
        let mut req = project();
        req.project_name = String::new();
        assert_eq!(
            message(validate_project(&req).unwrap_err()),
            "Project name is required"
        );

        let mut req = project();
        req.industry = " ".to_string();
        assert_eq!(
            message(validate_project(&req).unwrap_err()),
            "Industry is required"
        );
    }

    #[test]
    fn test_project_requires_answers() {
        let mut req = project();
        req.project_data.clear();
        assert_eq!(
            message(validate_project(&req).unwrap_err()),
            "Project data is required"
        );
    }

    #[test]
    fn test_project_rejects_blank_answer_or_missing_issue() {
        let mut req = project();
        req.project_data.push(AnswerSubmission::new(2, "  "));
        assert_eq!(
            message(validate_project(&req).unwrap_err()),
            "Each project data item must have issue_id and non-empty value"
        );

        let mut req = project();
        req.project_data = vec![AnswerSubmission::new(0, "value")];
        assert!(validate_project(&req).is_err());
    }

    #[test]
    fn test_project_rejects_negative_revenue() {
        let mut req = project();
        req.annual_revenue = Some(-1.0);
        assert!(validate_project(&req).is_err());

        req.annual_revenue = Some(f64::NAN);
        assert!(validate_project(&req).is_err());

        req.annual_revenue = None;
        assert!(validate_project(&req).is_ok());
    }

    proptest! {
        #[test]
        fn test_normalized_email_never_has_uppercase(s in "[A-Za-z]{1,10}@[A-Za-z]{1,10}\\.[A-Za-z]{2,4}") {
            let email = normalize_email(&s);
            prop_assert!(is_valid_email(&email));
            prop_assert!(!email.chars().any(|c| c.is_ascii_uppercase()));
        }

        #[test]
        fn test_whitespace_emails_rejected(a in "[a-z]{1,5}", b in "[a-z]{1,5}") {
            let email = format!("{a} {b}@example.com");
            prop_assert!(!is_valid_email(&email));
        }

        #[test]
        fn test_strong_passwords_accepted(core in "[a-z]{4,20}") {
            let mut req = registration();
            req.password = format!("X{core}9");
            prop_assert!(validate_registration(&req).is_ok());
        }
    }
}
