use std::{
    cell::RefCell,
    fmt,
    rc::Rc,
    sync::LazyLock,
};

use regex::Regex;
use tracing::{debug, info};

use crate::{
    EMAIL_REGEX, MIN_PHONE_DIGITS, PHONE_REGEX,
    config::FormConfig,
    page::{Page, ScheduledTask, Scheduler},
};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_REGEX).expect("email pattern is valid"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_REGEX).expect("phone pattern is valid"));

pub const SUCCESS_TEXT: &str = "Thank you for your inquiry! We will get back to you soon.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Phone,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::Message,
    ];

    // the name attribute of the control in the contact form
    pub fn name(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::Message => "message",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    MissingField(FormField),
    InvalidEmail,
    InvalidPhone,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingField(_) => write!(f, "Please fill in all required fields."),
            ValidationError::InvalidEmail => write!(f, "Please enter a valid email address."),
            ValidationError::InvalidPhone => write!(f, "Please enter a valid phone number."),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormOutcome {
    Success,
    Error(ValidationError),
}

impl FormOutcome {
    pub fn class(&self) -> &'static str {
        match self {
            FormOutcome::Success => "success",
            FormOutcome::Error(_) => "error",
        }
    }

    pub fn text(&self) -> String {
        match self {
            FormOutcome::Success => SUCCESS_TEXT.to_owned(),
            FormOutcome::Error(err) => err.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Message => &self.message,
        }
    }

    // rules run in a fixed order and the first failure wins: required fields, then the email
    // shape, then the phone alphabet and digit count.  emptiness is checked on the raw value,
    // so whitespace counts as filled in
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(field) = FormField::ALL
            .into_iter()
            .find(|&field| self.field(field).is_empty())
        {
            return Err(ValidationError::MissingField(field));
        }

        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }

        if !is_valid_phone(&self.phone) {
            return Err(ValidationError::InvalidPhone);
        }

        Ok(())
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE.is_match(phone) && phone.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS
}

// contact form
//
// nothing is ever sent anywhere: a valid submission only shows the thank-you message and, after
// the clear delay, resets the form.  a newer submission cancels the pending clear of an older one
// so a stale timer can never wipe the newer message
pub struct FormValidator<P: Page, S: Scheduler> {
    page: Rc<P>,
    scheduler: Rc<S>,
    form: P::Node,
    message: Option<P::Node>,
    message_class: String,
    clear_delay_ms: u32,
    pending_clear: RefCell<Option<ScheduledTask>>,
}

impl<P: Page + 'static, S: Scheduler> FormValidator<P, S> {
    pub fn init(page: Rc<P>, scheduler: Rc<S>, config: &FormConfig) -> Option<Self> {
        let Some(form) = page.by_id(&config.form_id) else {
            debug!("no contact form, skipping validation");
            return None;
        };

        let message = page.by_id(&config.message_id);
        if message.is_none() {
            debug!("contact form has no message slot, results will not be shown");
        }

        Some(FormValidator {
            page,
            scheduler,
            form,
            message,
            message_class: config.message_class.clone(),
            clear_delay_ms: config.clear_delay_ms,
            pending_clear: RefCell::new(None),
        })
    }

    pub fn form(&self) -> &P::Node {
        &self.form
    }

    pub fn read_submission(&self) -> ContactSubmission {
        let read = |field: FormField| {
            self.page
                .field_value(&self.form, field.name())
                .unwrap_or_default()
        };

        ContactSubmission {
            name: read(FormField::Name),
            email: read(FormField::Email),
            phone: read(FormField::Phone),
            message: read(FormField::Message),
        }
    }

    // the caller always suppresses the browser's own submission
    pub fn on_submit(&self) -> FormOutcome {
        if let Some(pending) = self.pending_clear.borrow_mut().take() {
            pending.cancel();
        }

        let outcome = match self.read_submission().validate() {
            Ok(()) => FormOutcome::Success,
            Err(err) => FormOutcome::Error(err),
        };
        info!("contact form submitted: {outcome:?}");

        self.show(&outcome);

        if outcome == FormOutcome::Success {
            let page = self.page.clone();
            let form = self.form.clone();
            let message = self.message.clone();
            let message_class = self.message_class.clone();

            let task = self.scheduler.schedule(
                self.clear_delay_ms,
                Box::new(move || {
                    page.reset_form(&form);
                    if let Some(message) = message {
                        hide_message(page.as_ref(), &message, &message_class);
                    }
                }),
            );
            *self.pending_clear.borrow_mut() = Some(task);
        }

        outcome
    }

    fn show(&self, outcome: &FormOutcome) {
        let Some(message) = &self.message else {
            return;
        };

        self.page.set_text(message, &outcome.text());
        self.page.set_attribute(
            message,
            "class",
            &format!("{} {}", self.message_class, outcome.class()),
        );
        self.page.set_style(message, "display", "block");
        self.page.scroll_into_view(message);
    }
}

fn hide_message<P: Page>(page: &P, message: &P::Node, message_class: &str) {
    page.set_style(message, "display", "none");
    page.set_attribute(message, "class", message_class);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeNode, FakePage, ManualScheduler};

    struct Fixture {
        page: Rc<FakePage>,
        scheduler: Rc<ManualScheduler>,
        message: FakeNode,
        inputs: Vec<FakeNode>,
        validator: FormValidator<FakePage, ManualScheduler>,
    }

    fn fixture() -> Fixture {
        let page = Rc::new(FakePage::new());
        let scheduler = Rc::new(ManualScheduler::new());

        let form = page.spawn(&page.body(), "form#contactForm");
        let inputs = vec![
            page.spawn(&form, "input[name=name]"),
            page.spawn(&form, "input[name=email]"),
            page.spawn(&form, "input[name=phone]"),
            page.spawn(&form, "textarea[name=message]"),
        ];
        let message = page.spawn(&page.body(), "div#formMessage.form-message");

        let validator =
            FormValidator::init(page.clone(), scheduler.clone(), &FormConfig::default()).unwrap();

        Fixture {
            page,
            scheduler,
            message,
            inputs,
            validator,
        }
    }

    fn fill(fixture: &Fixture, values: [&str; 4]) {
        for (input, value) in fixture.inputs.iter().zip(values) {
            fixture.page.set_value(input, value);
        }
    }

    fn valid() -> ContactSubmission {
        ContactSubmission {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: "123-456-7890".into(),
            message: "Pallets of widgets, please".into(),
        }
    }

    #[test]
    fn each_missing_field_is_reported_first() {
        for field in FormField::ALL {
            let mut submission = valid();
            submission.email = "not-an-email".into();
            match field {
                FormField::Name => submission.name.clear(),
                FormField::Email => submission.email.clear(),
                FormField::Phone => submission.phone.clear(),
                FormField::Message => submission.message.clear(),
            }

            assert_eq!(
                submission.validate(),
                Err(ValidationError::MissingField(field))
            );
        }
    }

    #[test]
    fn whitespace_counts_as_filled() {
        let mut submission = valid();
        submission.message = "   ".into();

        assert_eq!(submission.validate(), Ok(()));
    }

    #[test]
    fn email_pattern_is_permissive() {
        for email in ["a@b.c", "first.last@example.co.uk", "x@localhost.invalid"] {
            assert!(is_valid_email(email), "{email} should pass");
        }
        for email in ["plain", "a@b", "a @b.c", "@b.c", "a@.c", "a@b@c.d"] {
            assert!(!is_valid_email(email), "{email} should fail");
        }
    }

    #[test]
    fn email_runs_before_phone() {
        let mut submission = valid();
        submission.email = "nope".into();
        submission.phone = "12".into();

        assert_eq!(submission.validate(), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn phone_needs_ten_digits() {
        assert!(is_valid_phone("123-456-7890"));
        assert!(is_valid_phone("+1 (555) 010-9999"));
        assert!(!is_valid_phone("123-4567"));
        assert!(!is_valid_phone("----------"));
        assert!(!is_valid_phone("555-010-99x9"));
    }

    #[test]
    fn invalid_submission_shows_error_message() {
        let fixture = fixture();
        fill(&fixture, ["Ada", "ada@example.com", "", "hello"]);

        let outcome = fixture.validator.on_submit();

        assert_eq!(
            outcome,
            FormOutcome::Error(ValidationError::MissingField(FormField::Phone))
        );
        assert_eq!(
            fixture.page.text(&fixture.message),
            "Please fill in all required fields."
        );
        assert_eq!(
            fixture.page.classes(&fixture.message),
            vec!["form-message", "error"]
        );
        assert_eq!(
            fixture.page.style(&fixture.message, "display").as_deref(),
            Some("block")
        );
        assert_eq!(fixture.scheduler.pending(), 0);
    }

    #[test]
    fn success_clears_form_after_delay() {
        let fixture = fixture();
        fill(&fixture, ["Ada", "ada@example.com", "123-456-7890", "hello"]);

        assert_eq!(fixture.validator.on_submit(), FormOutcome::Success);
        assert_eq!(fixture.page.text(&fixture.message), SUCCESS_TEXT);
        assert_eq!(fixture.page.revealed(), vec![fixture.message]);

        fixture.scheduler.advance(4999);
        assert_eq!(fixture.page.value(&fixture.inputs[0]), "Ada");

        fixture.scheduler.advance(1);
        assert_eq!(fixture.page.value(&fixture.inputs[0]), "");
        assert_eq!(
            fixture.page.style(&fixture.message, "display").as_deref(),
            Some("none")
        );
        assert_eq!(fixture.page.classes(&fixture.message), vec!["form-message"]);
    }

    #[test]
    fn newer_submission_cancels_stale_clear() {
        let fixture = fixture();
        fill(&fixture, ["Ada", "ada@example.com", "123-456-7890", "hello"]);
        fixture.validator.on_submit();

        fixture.scheduler.advance(3000);
        fill(&fixture, ["Ada", "ada@example", "123-456-7890", "hello"]);
        fixture.validator.on_submit();

        // the first submission's deadline passes without touching the newer message
        fixture.scheduler.advance(2500);
        assert_eq!(
            fixture.page.text(&fixture.message),
            "Please enter a valid email address."
        );
        assert_eq!(
            fixture.page.style(&fixture.message, "display").as_deref(),
            Some("block")
        );
        assert_eq!(fixture.page.value(&fixture.inputs[1]), "ada@example");
        assert_eq!(fixture.scheduler.pending(), 0);
    }

    #[test]
    fn missing_message_slot_still_validates() {
        let page = Rc::new(FakePage::new());
        let scheduler = Rc::new(ManualScheduler::new());
        page.spawn(&page.body(), "form#contactForm");

        let validator =
            FormValidator::init(page.clone(), scheduler, &FormConfig::default()).unwrap();

        assert_eq!(
            validator.on_submit(),
            FormOutcome::Error(ValidationError::MissingField(FormField::Name))
        );
        assert!(page.revealed().is_empty());
    }
}
