//! The fixed set of in-band control codes

use super::operand::{normalize_name, Operand};
use std::fmt;

/// Reserved byte values in a message's byte stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ControlCode {
    LineBreak = 0x01,
    End = 0x02,
    NewBox = 0x04,
    Color = 0x05,
    Spaces = 0x06,
    Jump = 0x07,
    DrawInstant = 0x08,
    DrawChar = 0x09,
    ShopDescription = 0x0A,
    Event = 0x0B,
    Delay = 0x0C,
    AwaitButton = 0x0D,
    Fade = 0x0E,
    Player = 0x0F,
    Ocarina = 0x10,
    Fade2 = 0x11,
    Sound = 0x12,
    Icon = 0x13,
    Speed = 0x14,
    Background = 0x15,
    MarathonTime = 0x16,
    RaceTime = 0x17,
    Points = 0x18,
    GoldSkulltulas = 0x19,
    NoSkip = 0x1A,
    TwoChoices = 0x1B,
    ThreeChoices = 0x1C,
    FishWeight = 0x1D,
    HighScore = 0x1E,
    Time = 0x1F,

    Dash = 0x7F,

    AButton = 0x9F,
    BButton = 0xA0,
    CButton = 0xA1,
    LButton = 0xA2,
    RButton = 0xA3,
    ZButton = 0xA4,
    CUp = 0xA5,
    CDown = 0xA6,
    CLeft = 0xA7,
    CRight = 0xA8,
    Triangle = 0xA9,
    ControlStick = 0xAA,
    DPad = 0xAB,
}

impl ControlCode {
    pub const ALL: [ControlCode; 44] = [
        ControlCode::LineBreak,
        ControlCode::End,
        ControlCode::NewBox,
        ControlCode::Color,
        ControlCode::Spaces,
        ControlCode::Jump,
        ControlCode::DrawInstant,
        ControlCode::DrawChar,
        ControlCode::ShopDescription,
        ControlCode::Event,
        ControlCode::Delay,
        ControlCode::AwaitButton,
        ControlCode::Fade,
        ControlCode::Player,
        ControlCode::Ocarina,
        ControlCode::Fade2,
        ControlCode::Sound,
        ControlCode::Icon,
        ControlCode::Speed,
        ControlCode::Background,
        ControlCode::MarathonTime,
        ControlCode::RaceTime,
        ControlCode::Points,
        ControlCode::GoldSkulltulas,
        ControlCode::NoSkip,
        ControlCode::TwoChoices,
        ControlCode::ThreeChoices,
        ControlCode::FishWeight,
        ControlCode::HighScore,
        ControlCode::Time,
        ControlCode::Dash,
        ControlCode::AButton,
        ControlCode::BButton,
        ControlCode::CButton,
        ControlCode::LButton,
        ControlCode::RButton,
        ControlCode::ZButton,
        ControlCode::CUp,
        ControlCode::CDown,
        ControlCode::CLeft,
        ControlCode::CRight,
        ControlCode::Triangle,
        ControlCode::ControlStick,
        ControlCode::DPad,
    ];

    pub fn byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        let code = match byte {
            0x01 => ControlCode::LineBreak,
            0x02 => ControlCode::End,
            0x04 => ControlCode::NewBox,
            0x05 => ControlCode::Color,
            0x06 => ControlCode::Spaces,
            0x07 => ControlCode::Jump,
            0x08 => ControlCode::DrawInstant,
            0x09 => ControlCode::DrawChar,
            0x0A => ControlCode::ShopDescription,
            0x0B => ControlCode::Event,
            0x0C => ControlCode::Delay,
            0x0D => ControlCode::AwaitButton,
            0x0E => ControlCode::Fade,
            0x0F => ControlCode::Player,
            0x10 => ControlCode::Ocarina,
            0x11 => ControlCode::Fade2,
            0x12 => ControlCode::Sound,
            0x13 => ControlCode::Icon,
            0x14 => ControlCode::Speed,
            0x15 => ControlCode::Background,
            0x16 => ControlCode::MarathonTime,
            0x17 => ControlCode::RaceTime,
            0x18 => ControlCode::Points,
            0x19 => ControlCode::GoldSkulltulas,
            0x1A => ControlCode::NoSkip,
            0x1B => ControlCode::TwoChoices,
            0x1C => ControlCode::ThreeChoices,
            0x1D => ControlCode::FishWeight,
            0x1E => ControlCode::HighScore,
            0x1F => ControlCode::Time,
            0x7F => ControlCode::Dash,
            0x9F => ControlCode::AButton,
            0xA0 => ControlCode::BButton,
            0xA1 => ControlCode::CButton,
            0xA2 => ControlCode::LButton,
            0xA3 => ControlCode::RButton,
            0xA4 => ControlCode::ZButton,
            0xA5 => ControlCode::CUp,
            0xA6 => ControlCode::CDown,
            0xA7 => ControlCode::CLeft,
            0xA8 => ControlCode::CRight,
            0xA9 => ControlCode::Triangle,
            0xAA => ControlCode::ControlStick,
            0xAB => ControlCode::DPad,
            _ => return None,
        };
        Some(code)
    }

    /// Canonical tag name, as written between `<` and `>`
    pub fn name(self) -> &'static str {
        match self {
            ControlCode::LineBreak => "Line Break",
            ControlCode::End => "End",
            ControlCode::NewBox => "New Box",
            ControlCode::Color => "Color",
            ControlCode::Spaces => "Spaces",
            ControlCode::Jump => "Jump",
            ControlCode::DrawInstant => "Draw Instant",
            ControlCode::DrawChar => "Draw Char",
            ControlCode::ShopDescription => "Shop Description",
            ControlCode::Event => "Event",
            ControlCode::Delay => "Delay",
            ControlCode::AwaitButton => "Await Button",
            ControlCode::Fade => "Fade",
            ControlCode::Player => "Player",
            ControlCode::Ocarina => "Ocarina",
            ControlCode::Fade2 => "Fade2",
            ControlCode::Sound => "Sound",
            ControlCode::Icon => "Icon",
            ControlCode::Speed => "Speed",
            ControlCode::Background => "Background",
            ControlCode::MarathonTime => "Marathon Time",
            ControlCode::RaceTime => "Race Time",
            ControlCode::Points => "Points",
            ControlCode::GoldSkulltulas => "Gold Skulltulas",
            ControlCode::NoSkip => "No Skip",
            ControlCode::TwoChoices => "Two Choices",
            ControlCode::ThreeChoices => "Three Choices",
            ControlCode::FishWeight => "Fish Weight",
            ControlCode::HighScore => "High Score",
            ControlCode::Time => "Time",
            ControlCode::Dash => "Dash",
            ControlCode::AButton => "A Button",
            ControlCode::BButton => "B Button",
            ControlCode::CButton => "C Button",
            ControlCode::LButton => "L Button",
            ControlCode::RButton => "R Button",
            ControlCode::ZButton => "Z Button",
            ControlCode::CUp => "C Up",
            ControlCode::CDown => "C Down",
            ControlCode::CLeft => "C Left",
            ControlCode::CRight => "C Right",
            ControlCode::Triangle => "Triangle",
            ControlCode::ControlStick => "Control Stick",
            ControlCode::DPad => "D Pad",
        }
    }

    /// Names accepted on encode besides the canonical one
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            ControlCode::NewBox => &["Box Break"],
            ControlCode::DPad => &["D-Pad"],
            ControlCode::AwaitButton => &["Unused1"],
            ControlCode::Fade2 => &["Unused2"],
            _ => &[],
        }
    }

    pub fn operand(self) -> Operand {
        match self {
            ControlCode::Color => Operand::Color,
            ControlCode::Spaces
            | ControlCode::Delay
            | ControlCode::Fade
            | ControlCode::Icon
            | ControlCode::Speed => Operand::Byte,
            ControlCode::Jump | ControlCode::Fade2 => Operand::Short,
            ControlCode::Sound => Operand::Sound,
            ControlCode::Background => Operand::Triple,
            ControlCode::HighScore => Operand::HighScore,
            _ => Operand::None,
        }
    }

    /// Whether a configured display string may replace this code's rendering
    pub fn is_overridable(self) -> bool {
        self.operand() == Operand::None
            && !matches!(self, ControlCode::LineBreak | ControlCode::NewBox | ControlCode::End)
    }

    /// Look a code up by canonical name or alias
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = normalize_name(name);
        Self::ALL.iter().copied().find(|code| {
            normalize_name(code.name()) == wanted
                || code.aliases().iter().any(|alias| normalize_name(alias) == wanted)
        })
    }
}

impl fmt::Display for ControlCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04X} <{}>", self.byte(), self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_mapping_is_bijective() {
        for code in ControlCode::ALL {
            assert_eq!(ControlCode::from_byte(code.byte()), Some(code));
        }
        let mapped = (0..=255u8).filter(|b| ControlCode::from_byte(*b).is_some()).count();
        assert_eq!(mapped, ControlCode::ALL.len());
    }

    #[test]
    fn test_unmapped_bytes() {
        assert_eq!(ControlCode::from_byte(0x00), None);
        assert_eq!(ControlCode::from_byte(0x03), None);
        assert_eq!(ControlCode::from_byte(b'A'), None);
        assert_eq!(ControlCode::from_byte(0xAC), None);
    }

    #[test]
    fn test_names_resolve() {
        assert_eq!(ControlCode::from_name("two choices"), Some(ControlCode::TwoChoices));
        assert_eq!(ControlCode::from_name("Box Break"), Some(ControlCode::NewBox));
        assert_eq!(ControlCode::from_name("High_Score"), Some(ControlCode::HighScore));
        assert_eq!(ControlCode::from_name("Unused1"), Some(ControlCode::AwaitButton));
        assert_eq!(ControlCode::from_name("unused2"), Some(ControlCode::Fade2));
        assert_eq!(ControlCode::from_name("Nope"), None);
    }

    #[test]
    fn test_operand_arity() {
        assert_eq!(ControlCode::Color.operand().width(), 1);
        assert_eq!(ControlCode::Jump.operand().width(), 2);
        assert_eq!(ControlCode::Sound.operand().width(), 2);
        assert_eq!(ControlCode::Background.operand().width(), 3);
        assert_eq!(ControlCode::TwoChoices.operand().width(), 0);
    }

    #[test]
    fn test_overridable_codes() {
        assert!(ControlCode::AButton.is_overridable());
        assert!(ControlCode::ThreeChoices.is_overridable());
        assert!(!ControlCode::LineBreak.is_overridable());
        assert!(!ControlCode::Color.is_overridable());
    }
}
