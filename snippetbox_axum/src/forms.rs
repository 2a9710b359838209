//! Submitted forms and their validation rules

use serde::Deserialize;

use snippetbox::{EMAIL_RX, Validator, matches, max_chars, min_chars, not_blank, permitted_value};

use crate::templates::FormState;

const BLANK: &str = "This field cannot be blank";

#[derive(Debug, Deserialize)]
pub struct SnippetCreateForm {
    pub title: String,
    pub content: String,
    pub expires: String,
}

#[derive(Debug, Deserialize)]
pub struct UserSignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UserLoginForm {
    pub email: String,
    pub password: String,
}

fn into_state(validator: Validator, values: &[(&str, String)]) -> FormState {
    FormState {
        values: values
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
        field_errors: validator.field_errors,
        non_field_errors: validator.non_field_errors,
    }
}

impl SnippetCreateForm {
    /// Lifetime in days, if the submitted value is a number.
    pub fn expires_days(&self) -> Option<u32> {
        self.expires.trim().parse().ok()
    }

    pub fn validate(&self) -> Validator {
        let mut v = Validator::default();
        v.check_field(not_blank(&self.title), "title", BLANK);
        v.check_field(
            max_chars(&self.title, 100),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(not_blank(&self.content), "content", BLANK);
        v.check_field(
            self.expires_days()
                .is_some_and(|days| permitted_value(&days, &[1, 7, 365])),
            "expires",
            "This field must equal 1, 7 or 365",
        );
        v
    }

    pub fn to_state(&self, validator: Validator) -> FormState {
        into_state(
            validator,
            &[
                ("title", self.title.clone()),
                ("content", self.content.clone()),
                ("expires", self.expires.clone()),
            ],
        )
    }
}

impl UserSignupForm {
    pub fn validate(&self) -> Validator {
        let mut v = Validator::default();
        v.check_field(not_blank(&self.name), "name", BLANK);
        v.check_field(not_blank(&self.email), "email", BLANK);
        v.check_field(
            matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(not_blank(&self.password), "password", BLANK);
        v.check_field(
            min_chars(&self.password, 8),
            "password",
            "This field must be at least 8 characters long",
        );
        v
    }

    /// Form state for re-display. The password is never echoed back.
    pub fn to_state(&self, validator: Validator) -> FormState {
        into_state(
            validator,
            &[("name", self.name.clone()), ("email", self.email.clone())],
        )
    }
}

impl UserLoginForm {
    pub fn validate(&self) -> Validator {
        let mut v = Validator::default();
        v.check_field(not_blank(&self.email), "email", BLANK);
        v.check_field(
            matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(not_blank(&self.password), "password", BLANK);
        v
    }

    pub fn to_state(&self, validator: Validator) -> FormState {
        into_state(validator, &[("email", self.email.clone())])
    }
}
