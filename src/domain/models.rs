use std::fmt::Display;

/// Greeting a freshly provisioned user starts with until they change it.
pub const DEFAULT_GREETING: &str = "Hello! This is an AI Assistant. How may I help you?";

/// One-way calls play a transmission message; two-way calls hold a
/// conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallType {
    OneWay,
    TwoWay,
}

impl CallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallType::OneWay => "1way",
            CallType::TwoWay => "2way",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "1way" => Some(CallType::OneWay),
            "2way" => Some(CallType::TwoWay),
            _ => None,
        }
    }
}

impl Display for CallType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Follow-up lifecycle tag on a call record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CallbackStatus {
    Yes,
    #[default]
    No,
    CallbackDone,
    CallbackNeeded,
}

impl CallbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackStatus::Yes => "yes",
            CallbackStatus::No => "no",
            CallbackStatus::CallbackDone => "callback_done",
            CallbackStatus::CallbackNeeded => "callback_needed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "yes" => Some(CallbackStatus::Yes),
            "no" => Some(CallbackStatus::No),
            "callback_done" => Some(CallbackStatus::CallbackDone),
            "callback_needed" => Some(CallbackStatus::CallbackNeeded),
            _ => None,
        }
    }
}

impl Display for CallbackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_type_round_trips() {
        for raw in ["1way", "2way"] {
            assert_eq!(CallType::parse(raw).unwrap().as_str(), raw);
        }
        assert_eq!(CallType::parse("3way"), None);
    }

    #[test]
    fn callback_status_round_trips() {
        for raw in ["yes", "no", "callback_done", "callback_needed"] {
            assert_eq!(CallbackStatus::parse(raw).unwrap().as_str(), raw);
        }
        assert_eq!(CallbackStatus::parse("maybe"), None);
    }

    #[test]
    fn callback_status_defaults_to_no() {
        assert_eq!(CallbackStatus::default(), CallbackStatus::No);
    }
}
