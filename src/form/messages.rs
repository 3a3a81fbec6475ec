//! Message lookup for user-facing strings
//!
//! Validators and notifications never hold text themselves; they ask a
//! [`MessageLookup`] for a fixed key such as `errors.dob_future`.

/// `t(key) -> string`
pub trait MessageLookup {
    fn lookup(&self, key: &str) -> String;
}

impl<F> MessageLookup for F
where
    F: Fn(&str) -> String,
{
    fn lookup(&self, key: &str) -> String {
        self(key)
    }
}

/// Built-in English strings. Unknown keys echo back unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl DefaultMessages {
    pub fn get(key: &str) -> Option<&'static str> {
        let text = match key {
            "errors.title" => "Validation error",
            "errors.fix_fields" => "Please fix the highlighted fields.",
            "errors.first_name_required" => "First name is required.",
            "errors.last_name_required" => "Last name is required.",
            "errors.name_invalid" => "Names may only contain letters, spaces, apostrophes and hyphens.",
            "errors.smoke_required" => "Please tell us whether you smoke.",
            "errors.cpd_required" => "Please enter how many cigarettes you smoke per day.",
            "errors.cpd_min" => "Cigarettes per day cannot be negative.",
            "errors.cpd_max" => "Cigarettes per day cannot exceed 30.",
            "errors.cpd_integer" => "Cigarettes per day must be a whole number.",
            "errors.number_invalid" => "Please enter a number.",
            "errors.height_required" => "Height is required.",
            "errors.height_min" => "Height must be at least 50 cm.",
            "errors.height_max" => "Height cannot exceed 250 cm.",
            "errors.weight_required" => "Weight is required.",
            "errors.weight_min" => "Weight must be at least 2 kg.",
            "errors.weight_max" => "Weight cannot exceed 300 kg.",
            "errors.dob_required" => "Date of birth is required.",
            "errors.dob_invalid" => "Please enter a valid date (DD.MM.YYYY).",
            "errors.dob_future" => "Date of birth cannot be in the future.",
            "errors.age_max" => "Applicants must be at most 100 years old.",
            "errors.age_min_exact" => "Applicants must be at least 1 year old.",
            "errors.insurance_price_invalid" => "Insurance price must be at least 1.",
            "prefill.title" => "Prefilled",
            "prefill.message" => "We prefilled your form from the uploaded document.",
            "title" => "Insurance application",
            "submitted" => "Your application was submitted.",
            _ => return None,
        };
        Some(text)
    }
}

impl MessageLookup for DefaultMessages {
    fn lookup(&self, key: &str) -> String {
        Self::get(key).unwrap_or(key).to_string()
    }
}
