#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Read,
    Create,
    Append,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::List,
        Operation::Read,
        Operation::Create,
        Operation::Append,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Operation::List => "List notes",
            Operation::Read => "Read a note",
            Operation::Create => "Create / overwrite a note",
            Operation::Append => "Append to a note",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|op| *op == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|op| *op == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// One entry of the text menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Run(Operation),
    Exit,
}

impl MenuChoice {
    pub const MENU: [(char, MenuChoice); 5] = [
        ('1', MenuChoice::Run(Operation::List)),
        ('2', MenuChoice::Run(Operation::Read)),
        ('3', MenuChoice::Run(Operation::Create)),
        ('4', MenuChoice::Run(Operation::Append)),
        ('0', MenuChoice::Exit),
    ];

    pub fn parse(input: &str) -> Option<Self> {
        let mut chars = input.trim().chars();
        let key = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::MENU
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, choice)| *choice)
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Run(op) => op.label(),
            MenuChoice::Exit => "Exit",
        }
    }
}

/// Actions of the full-screen form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Run,
    Refresh,
    FocusNext,
    FocusPrev,
    Up,
    Down,
    Left,
    Right,
    Insert(char),
    NewLine,
    Backspace,
    Confirm,
    Dismiss,
}
