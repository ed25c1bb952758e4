//! Start menu and numeric input fields

use std::io::{Stdout, Write};

use crossterm::{
    cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

/// Entries of the start menu, selectable by arrow keys or by their number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    RunStandard,
    SetUp,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 3] = [
        MenuChoice::RunStandard,
        MenuChoice::SetUp,
        MenuChoice::Exit,
    ];

    fn shortcut(self) -> char {
        match self {
            MenuChoice::RunStandard => '1',
            MenuChoice::SetUp => '2',
            MenuChoice::Exit => '0',
        }
    }

    fn from_shortcut(c: char) -> Option<MenuChoice> {
        MenuChoice::ALL.into_iter().find(|choice| choice.shortcut() == c)
    }

    fn position(self) -> usize {
        match self {
            MenuChoice::RunStandard => 0,
            MenuChoice::SetUp => 1,
            MenuChoice::Exit => 2,
        }
    }

    /// Entry below this one, wrapping to the top.
    fn next(self) -> MenuChoice {
        MenuChoice::ALL[(self.position() + 1) % MenuChoice::ALL.len()]
    }

    /// Entry above this one, wrapping to the bottom.
    fn previous(self) -> MenuChoice {
        let len = MenuChoice::ALL.len();
        MenuChoice::ALL[(self.position() + len - 1) % len]
    }

    /// Show the menu until an entry is picked. Esc counts as Exit.
    pub fn choose(stdout: &mut Stdout) -> std::io::Result<MenuChoice> {
        queue!(stdout, cursor::Hide, cursor::SavePosition)?;
        let mut highlighted = MenuChoice::RunStandard;

        let picked = loop {
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown),
                style::PrintStyledContent(
                    "Choose how to run (arrows + Enter, a number, or Esc to exit):"
                        .with(Color::Yellow)
                )
            )?;
            for choice in MenuChoice::ALL {
                let line = format!("\r\n{}", choice);
                if choice == highlighted {
                    queue!(stdout, style::PrintStyledContent(line.reverse()))?;
                } else {
                    queue!(stdout, style::Print(line))?;
                }
            }
            queue!(stdout, style::Print("\r\n"))?;
            stdout.flush()?;

            let event::Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != event::KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Up => highlighted = highlighted.previous(),
                KeyCode::Down => highlighted = highlighted.next(),
                KeyCode::Enter => break highlighted,
                KeyCode::Esc => break MenuChoice::Exit,
                KeyCode::Char(c) => {
                    if let Some(choice) = MenuChoice::from_shortcut(c) {
                        break choice;
                    }
                }
                _ => {}
            }
        };
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            cursor::Show
        )?;
        stdout.flush()?;
        tracing::debug!("Menu choice {:?}", picked);
        Ok(picked)
    }
}

impl std::fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MenuChoice::RunStandard => "Run - standard settings",
            MenuChoice::SetUp => "Set up maze size",
            MenuChoice::Exit => "Exit",
        };
        write!(f, "{}. {}", self.shortcut(), label)
    }
}

/// Result of feeding one key to a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKey {
    Editing,
    Submit,
    Cancel,
}

/// Digits are appended and Backspace removes the last one; everything else is ignored.
fn apply_key(input: &mut String, code: KeyCode) -> FieldKey {
    match code {
        KeyCode::Enter => FieldKey::Submit,
        KeyCode::Esc => FieldKey::Cancel,
        KeyCode::Backspace => {
            input.pop();
            FieldKey::Editing
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            input.push(c);
            FieldKey::Editing
        }
        _ => FieldKey::Editing,
    }
}

/// Parse a number in `1..=max`, an empty input picks `default`.
pub fn parse_bounded(input: &str, max: u16, default: u16) -> Result<u16, String> {
    if input.is_empty() {
        return Ok(default);
    }
    let error_msg = format!("Please enter a number between 1 and {}.", max);
    match input.parse::<u16>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(error_msg),
    }
}

/// Ask for a number in `1..=max` below the cursor, colouring the input by validity.
/// Returns None if the user presses Esc.
pub fn read_number(
    stdout: &mut Stdout,
    label: &str,
    max: u16,
    default: u16,
) -> std::io::Result<Option<u16>> {
    queue!(stdout, cursor::SavePosition)?;
    let mut input = String::new();

    let value = loop {
        let parsed = parse_bounded(&input, max, default);
        let typed = match &parsed {
            Ok(_) => input.as_str().with(Color::Green),
            Err(_) => input.as_str().with(Color::Red),
        };
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            style::PrintStyledContent(label.with(Color::Cyan).attribute(Attribute::Bold)),
            style::PrintStyledContent(typed),
            style::Print(format!(" (1-{max}, Enter for {default})\r\n"))
        )?;
        if let Err(msg) = &parsed {
            queue!(
                stdout,
                style::PrintStyledContent(
                    msg.as_str().with(Color::DarkGrey).attribute(Attribute::Dim)
                )
            )?;
        }
        stdout.flush()?;

        let event::Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != event::KeyEventKind::Press {
            continue;
        }
        match apply_key(&mut input, key.code) {
            FieldKey::Editing => {}
            FieldKey::Submit => {
                if let Ok(n) = parsed {
                    break Some(n);
                }
            }
            FieldKey::Cancel => break None,
        }
    };
    queue!(
        stdout,
        cursor::RestorePosition,
        terminal::Clear(ClearType::FromCursorDown)
    )?;
    stdout.flush()?;
    Ok(value)
}
