//! Sign-in screen state: a login card and a register card.

use reel_store::RememberedUser;
use reel_types::{Email, Password};

use crate::text_field::TextField;

pub const LOGIN_INCOMPLETE: &str = "Please enter a valid email and password";
pub const TERMS_NOT_ACCEPTED: &str = "Please accept the terms and conditions";
pub const EMAIL_EMPTY: &str = "Email cannot be empty";
pub const PASSWORD_EMPTY: &str = "Password cannot be empty";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthCard {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Email,
    Password,
    ConfirmPassword,
    RememberMe,
    AcceptTerms,
    Submit,
    /// "Create account" on the login card, "Back to sign in" on register.
    SwitchCard,
}

impl AuthField {
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(
            self,
            AuthField::Email | AuthField::Password | AuthField::ConfirmPassword
        )
    }
}

const LOGIN_FIELDS: [AuthField; 5] = [
    AuthField::Email,
    AuthField::Password,
    AuthField::RememberMe,
    AuthField::Submit,
    AuthField::SwitchCard,
];

const REGISTER_FIELDS: [AuthField; 6] = [
    AuthField::Email,
    AuthField::Password,
    AuthField::ConfirmPassword,
    AuthField::AcceptTerms,
    AuthField::Submit,
    AuthField::SwitchCard,
];

/// Why a submit was refused before reaching the account store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormRejection {
    pub message: &'static str,
    /// Shown as a warning rather than an error.
    pub is_warning: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    card: AuthCard,
    focus: usize,
    pub email: TextField,
    pub password: TextField,
    pub remember_me: bool,
    pub register_email: TextField,
    pub register_password: TextField,
    pub confirm_password: TextField,
    pub accept_terms: bool,
}

impl AuthForm {
    /// Login card filled from "remember me", if any.
    #[must_use]
    pub fn prefilled(remembered: Option<RememberedUser>) -> Self {
        let mut form = Self::default();
        if let Some(user) = remembered {
            form.email = TextField::with_text(user.email);
            form.password = TextField::with_text(user.password);
            form.remember_me = true;
        }
        form
    }

    #[must_use]
    pub fn card(&self) -> AuthCard {
        self.card
    }

    #[must_use]
    pub fn fields(&self) -> &'static [AuthField] {
        match self.card {
            AuthCard::Login => &LOGIN_FIELDS,
            AuthCard::Register => &REGISTER_FIELDS,
        }
    }

    #[must_use]
    pub fn focused(&self) -> AuthField {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields().len();
    }

    pub fn focus_prev(&mut self) {
        let len = self.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn flip_card(&mut self) {
        self.card = match self.card {
            AuthCard::Login => AuthCard::Register,
            AuthCard::Register => AuthCard::Login,
        };
        self.focus = 0;
    }

    /// Text input under focus, if the focused field takes text.
    pub fn focused_text_mut(&mut self) -> Option<&mut TextField> {
        match (self.card, self.focused()) {
            (AuthCard::Login, AuthField::Email) => Some(&mut self.email),
            (AuthCard::Login, AuthField::Password) => Some(&mut self.password),
            (AuthCard::Register, AuthField::Email) => Some(&mut self.register_email),
            (AuthCard::Register, AuthField::Password) => Some(&mut self.register_password),
            (AuthCard::Register, AuthField::ConfirmPassword) => Some(&mut self.confirm_password),
            _ => None,
        }
    }

    /// Flip the focused checkbox. Returns false when focus is elsewhere.
    pub fn toggle_focused_checkbox(&mut self) -> bool {
        match self.focused() {
            AuthField::RememberMe => {
                self.remember_me = !self.remember_me;
                true
            }
            AuthField::AcceptTerms => {
                self.accept_terms = !self.accept_terms;
                true
            }
            _ => false,
        }
    }

    pub fn validate_login(&self) -> Result<(Email, Password), FormRejection> {
        let incomplete = FormRejection {
            message: LOGIN_INCOMPLETE,
            is_warning: true,
        };
        let email = Email::new(self.email.text()).map_err(|_| incomplete)?;
        let password = Password::new(self.password.text()).map_err(|_| incomplete)?;
        Ok((email, password))
    }

    /// Checks run in order: terms, email, password, confirmation.
    pub fn validate_register(&self) -> Result<(Email, Password), FormRejection> {
        if !self.accept_terms {
            return Err(FormRejection {
                message: TERMS_NOT_ACCEPTED,
                is_warning: true,
            });
        }
        let email = Email::new(self.register_email.text()).map_err(|_| FormRejection {
            message: EMAIL_EMPTY,
            is_warning: false,
        })?;
        let password = Password::new(self.register_password.text()).map_err(|_| FormRejection {
            message: PASSWORD_EMPTY,
            is_warning: false,
        })?;
        if self.register_password.text() != self.confirm_password.text() {
            return Err(FormRejection {
                message: PASSWORD_MISMATCH,
                is_warning: false,
            });
        }
        Ok((email, password))
    }

    /// After a successful registration: clear the register card and show login.
    pub(crate) fn finish_registration(&mut self) {
        self.register_email.clear();
        self.register_password.clear();
        self.confirm_password.clear();
        self.accept_terms = false;
        self.card = AuthCard::Login;
        self.focus = 0;
    }
}
