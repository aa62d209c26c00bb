//! Supporting classification records. Plain CRUD, no lifecycle rules.

use serde::{Deserialize, Serialize};

use academia_core::{Entity, GroupId, SpecialtyId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specialty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SpecialtyId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<GroupId>,
    pub name: String,
    pub specialty_id: SpecialtyId,
}

impl Entity for Specialty {
    type Id = SpecialtyId;

    fn id(&self) -> Option<&SpecialtyId> {
        self.id.as_ref()
    }
}

impl Entity for StudentGroup {
    type Id = GroupId;

    fn id(&self) -> Option<&GroupId> {
        self.id.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn group_decodes_with_its_specialty() {
        let group: StudentGroup =
            serde_json::from_value(json!({"id": 3, "name": "G1", "specialtyId": 2})).unwrap();

        assert_eq!(group.id(), Some(&GroupId::new(3)));
        assert_eq!(group.specialty_id, SpecialtyId::new(2));
    }

    #[test]
    fn new_specialty_has_no_id_on_the_wire() {
        let draft = Specialty {
            id: None,
            name: "Networks".into(),
            description: None,
        };

        assert_eq!(serde_json::to_value(&draft).unwrap(), json!({"name": "Networks"}));
        assert_eq!(draft.id(), None);
    }
}
