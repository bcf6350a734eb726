use crate::commands::{account, content, profile, social, tour};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "register",
            groups: account::REGISTER_EXAMPLES,
        },
        CommandExample {
            name: "login",
            groups: account::LOGIN_EXAMPLES,
        },
        CommandExample {
            name: "friend",
            groups: social::EXAMPLES,
        },
        CommandExample {
            name: "post",
            groups: content::EXAMPLES,
        },
        CommandExample {
            name: "timeline",
            groups: content::TIMELINE_EXAMPLES,
        },
        CommandExample {
            name: "profile",
            groups: profile::EXAMPLES,
        },
        CommandExample {
            name: "tour",
            groups: tour::EXAMPLES,
        },
    ]
}
