use crate::domain::SectionId;

pub const SECTION_ORDER: [SectionId; 6] = SectionId::ALL;

pub const LOGO_TARGET: SectionId = SectionId::Home;

pub const RECIPIENT_ADDRESS: &str = "sahbaz.dev@gmail.com";

pub fn first_section() -> SectionId {
    SECTION_ORDER[0]
}
