use serde::{Deserialize, Serialize};

use super::{Editable, Entity, EntityKind, SocialLinks};
use crate::forms::{FormFields, FormShape};

/// District-level team member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    pub position: String,
    pub district: String,
    pub state: String,
    pub phone: String,
    pub email: String,
    pub image_url: String,
    pub bio: String,
    pub socials: SocialLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutiveLeader {
    pub name: String,
    pub position: String,
    pub image_url: String,
    pub bio: String,
    /// Display order, lowest first
    pub rank: u32,
    pub achievements: Vec<String>,
    pub socials: SocialLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateLeader {
    pub name: String,
    pub position: String,
    pub state: String,
    pub phone: String,
    pub image_url: String,
    pub socials: SocialLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialMediaMember {
    pub name: String,
    pub role: String,
    pub image_url: String,
    pub platforms: Vec<String>,
    pub socials: SocialLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegalMember {
    pub name: String,
    pub title: String,
    pub specialization: String,
    pub email: String,
    pub phone: String,
    pub image_url: String,
    pub bio: String,
    pub years_of_experience: u32,
}

impl Entity for TeamMember {
    const KIND: EntityKind = EntityKind::TeamMember;
    type Draft = Self;
}
impl Editable for TeamMember {}

impl Entity for ExecutiveLeader {
    const KIND: EntityKind = EntityKind::ExecutiveLeader;
    type Draft = Self;
}
impl Editable for ExecutiveLeader {}

impl Entity for StateLeader {
    const KIND: EntityKind = EntityKind::StateLeader;
    type Draft = Self;
}
impl Editable for StateLeader {}

impl Entity for SocialMediaMember {
    const KIND: EntityKind = EntityKind::SocialMediaMember;
    type Draft = Self;
}
impl Editable for SocialMediaMember {}

impl Entity for LegalMember {
    const KIND: EntityKind = EntityKind::LegalMember;
    type Draft = Self;
}
impl Editable for LegalMember {}

impl FormShape for TeamMember {
    fn flatten(entity: Option<&Self>) -> FormFields {
        let member = entity.cloned().unwrap_or_default();
        let mut fields = FormFields::new();
        fields.set("name", member.name);
        fields.set("position", member.position);
        fields.set("district", member.district);
        fields.set("state", member.state);
        fields.set("phone", member.phone);
        fields.set("email", member.email);
        fields.set("image_url", member.image_url);
        fields.set("bio", member.bio);
        fields.set_links(&member.socials);
        fields
    }

    fn assemble(fields: &FormFields) -> Self {
        Self {
            name: fields.text("name"),
            position: fields.text("position"),
            district: fields.text("district"),
            state: fields.text("state"),
            phone: fields.text("phone"),
            email: fields.text("email"),
            image_url: fields.text("image_url"),
            bio: fields.text("bio"),
            socials: fields.links(),
        }
    }
}

impl FormShape for ExecutiveLeader {
    fn flatten(entity: Option<&Self>) -> FormFields {
        let leader = entity.cloned().unwrap_or_default();
        let mut fields = FormFields::new();
        fields.set("name", leader.name);
        fields.set("position", leader.position);
        fields.set("image_url", leader.image_url);
        fields.set("bio", leader.bio);
        fields.set_number("rank", leader.rank);
        // achievements are sentences and often contain commas
        fields.set_exact("achievements", &leader.achievements);
        fields.set_links(&leader.socials);
        fields
    }

    fn assemble(fields: &FormFields) -> Self {
        Self {
            name: fields.text("name"),
            position: fields.text("position"),
            image_url: fields.text("image_url"),
            bio: fields.text("bio"),
            rank: fields.number("rank"),
            achievements: fields.exact("achievements"),
            socials: fields.links(),
        }
    }
}

impl FormShape for StateLeader {
    fn flatten(entity: Option<&Self>) -> FormFields {
        let leader = entity.cloned().unwrap_or_default();
        let mut fields = FormFields::new();
        fields.set("name", leader.name);
        fields.set("position", leader.position);
        fields.set("state", leader.state);
        fields.set("phone", leader.phone);
        fields.set("image_url", leader.image_url);
        fields.set_links(&leader.socials);
        fields
    }

    fn assemble(fields: &FormFields) -> Self {
        Self {
            name: fields.text("name"),
            position: fields.text("position"),
            state: fields.text("state"),
            phone: fields.text("phone"),
            image_url: fields.text("image_url"),
            socials: fields.links(),
        }
    }
}

impl FormShape for SocialMediaMember {
    fn flatten(entity: Option<&Self>) -> FormFields {
        let member = entity.cloned().unwrap_or_default();
        let mut fields = FormFields::new();
        fields.set("name", member.name);
        fields.set("role", member.role);
        fields.set("image_url", member.image_url);
        fields.set_free_text("platforms", &member.platforms);
        fields.set_links(&member.socials);
        fields
    }

    fn assemble(fields: &FormFields) -> Self {
        Self {
            name: fields.text("name"),
            role: fields.text("role"),
            image_url: fields.text("image_url"),
            platforms: fields.free_text("platforms"),
            socials: fields.links(),
        }
    }
}

impl FormShape for LegalMember {
    fn flatten(entity: Option<&Self>) -> FormFields {
        let member = entity.cloned().unwrap_or_default();
        let mut fields = FormFields::new();
        fields.set("name", member.name);
        fields.set("title", member.title);
        fields.set("specialization", member.specialization);
        fields.set("email", member.email);
        fields.set("phone", member.phone);
        fields.set("image_url", member.image_url);
        fields.set("bio", member.bio);
        fields.set_number("years_of_experience", member.years_of_experience);
        fields
    }

    fn assemble(fields: &FormFields) -> Self {
        Self {
            name: fields.text("name"),
            title: fields.text("title"),
            specialization: fields.text("specialization"),
            email: fields.text("email"),
            phone: fields.text("phone"),
            image_url: fields.text("image_url"),
            bio: fields.text("bio"),
            years_of_experience: fields.number("years_of_experience"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{assemble_submission, flatten_record, Submission};
    use crate::models::Record;

    fn socials() -> SocialLinks {
        SocialLinks {
            facebook: "fb.com/ada".into(),
            twitter: "@ada".into(),
            instagram: String::new(),
            linkedin: "in/ada".into(),
            whatsapp: "+2348000000000".into(),
        }
    }

    #[test]
    fn test_team_member_round_trip() {
        let record = Record::new("t1", TeamMember {
            name: "Ada Obi".into(),
            position: "Ward coordinator".into(),
            district: "Ikeja".into(),
            state: "Lagos".into(),
            phone: "0800".into(),
            email: "ada@example.org".into(),
            image_url: "https://media/ada.jpg".into(),
            bio: "Organizer, teacher".into(),
            socials: socials(),
        });

        let fields = flatten_record(Some(&record));
        assert_eq!(fields.get("twitter"), Some("@ada"));
        assert_eq!(fields.get("instagram"), Some(""));

        let assembled = assemble_submission::<TeamMember>(&fields, Some(record.id.clone()));
        assert_eq!(assembled, Submission::Update(record));
    }

    #[test]
    fn test_executive_round_trip_keeps_commas_in_achievements() {
        let leader = ExecutiveLeader {
            name: "B. Musa".into(),
            position: "Chair".into(),
            rank: 2,
            achievements: vec!["Elected 2019, re-elected 2023".into(), "Youth wing".into()],
            socials: socials(),
            ..Default::default()
        };
        let fields = ExecutiveLeader::flatten(Some(&leader));
        assert_eq!(fields.get("rank"), Some("2"));
        assert_eq!(ExecutiveLeader::assemble(&fields), leader);
    }

    #[test]
    fn test_state_leader_round_trip() {
        let record = Record::new("s4", StateLeader {
            name: "Chidi Eze".into(),
            position: "State chairman".into(),
            state: "Enugu".into(),
            phone: "0803 000 0000".into(),
            image_url: "https://media/chidi.jpg".into(),
            socials: socials(),
        });

        let fields = flatten_record(Some(&record));
        assert_eq!(fields.get("state"), Some("Enugu"));
        let assembled = assemble_submission::<StateLeader>(&fields, Some(record.id.clone()));
        assert_eq!(assembled, Submission::Update(record));
    }

    #[test]
    fn test_social_media_member_round_trip() {
        let record = Record::new("sm2", SocialMediaMember {
            name: "Kemi Ade".into(),
            role: "Content lead".into(),
            image_url: "https://media/kemi.jpg".into(),
            platforms: vec!["X".into(), "TikTok".into(), "Instagram".into()],
            socials: socials(),
        });

        let fields = flatten_record(Some(&record));
        assert_eq!(fields.get("role"), Some("Content lead"));
        let assembled = assemble_submission::<SocialMediaMember>(&fields, Some(record.id.clone()));
        assert_eq!(assembled, Submission::Update(record));
    }

    #[test]
    fn test_legal_member_round_trip() {
        let record = Record::new("l1", LegalMember {
            name: "Barr. Ngozi Okafor".into(),
            title: "Senior counsel".into(),
            specialization: "Electoral law".into(),
            email: "ngozi@example.org".into(),
            phone: "0805".into(),
            image_url: "https://media/ngozi.jpg".into(),
            bio: "Tribunal petitions, 2015 and 2019".into(),
            years_of_experience: 18,
        });

        let fields = flatten_record(Some(&record));
        assert_eq!(fields.get("specialization"), Some("Electoral law"));
        assert_eq!(fields.get("years_of_experience"), Some("18"));
        let assembled = assemble_submission::<LegalMember>(&fields, Some(record.id.clone()));
        assert_eq!(assembled, Submission::Update(record));
    }

    #[test]
    fn test_platforms_are_free_text() {
        let member = SocialMediaMember {
            name: "Kemi".into(),
            platforms: vec!["X".into(), "TikTok".into()],
            ..Default::default()
        };
        let mut fields = SocialMediaMember::flatten(Some(&member));
        assert_eq!(fields.get("platforms"), Some("X, TikTok"));

        fields.set("platforms", " X ,TikTok,, Threads ");
        let assembled = SocialMediaMember::assemble(&fields);
        assert_eq!(assembled.platforms, vec!["X", "TikTok", "Threads"]);
    }

    #[test]
    fn test_legal_years_coerced() {
        let mut fields = LegalMember::flatten(None);
        assert_eq!(fields.get("years_of_experience"), Some("0"));

        fields.set("years_of_experience", "ten");
        assert_eq!(LegalMember::assemble(&fields).years_of_experience, 0);
        fields.set("years_of_experience", " 12");
        assert_eq!(LegalMember::assemble(&fields).years_of_experience, 12);
    }

    #[test]
    fn test_empty_people_forms() {
        let names = StateLeader::field_names();
        for key in SocialLinks::KEYS {
            assert!(names.iter().any(|n| n == key));
        }
        assert!(StateLeader::flatten(None).iter().all(|(_, v)| v.is_empty()));
    }
}
