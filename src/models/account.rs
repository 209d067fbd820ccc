use serde::{Deserialize, Serialize};

use super::{Entity, EntityKind};
use crate::forms::{FormFields, FormShape};

/// Privileged console account. Never carries the password.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub username: String,
    pub role: String,
}

/// Creation payload: identity fields plus the plaintext secret
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAccount {
    #[serde(flatten)]
    pub account: Account,
    pub password: String,
}

impl NewAccount {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            account: Account {
                username: username.into(),
                role: role.into(),
            },
            password: password.into(),
        }
    }
}

// Not Editable: accounts are only created and deleted
impl Entity for Account {
    const KIND: EntityKind = EntityKind::Account;
    type Draft = NewAccount;
}

impl FormShape for Account {
    fn flatten(entity: Option<&Self>) -> FormFields {
        let account = entity.cloned().unwrap_or_default();
        let mut fields = FormFields::new();
        fields.set("username", account.username);
        fields.set("role", account.role);
        fields
    }

    fn assemble(fields: &FormFields) -> Self {
        Self {
            username: fields.text("username"),
            role: fields.text("role"),
        }
    }
}

/// Creation form: the account fields plus an empty password
pub fn new_account_form() -> FormFields {
    let mut fields = Account::flatten(None);
    fields.set("password", "");
    fields
}

pub fn assemble_new_account(fields: &FormFields) -> NewAccount {
    NewAccount {
        account: Account::assemble(fields),
        password: fields.text("password"),
    }
}
