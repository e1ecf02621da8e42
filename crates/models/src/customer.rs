use sea_orm::entity::prelude::*;

/// Column widths of the `customer` table, in characters.
pub const MAX_NAME_LEN: usize = 255;
pub const MAX_EMAIL_LEN: usize = 320;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Characters allowed in an unquoted local-part atom besides alphanumerics.
const LOCAL_SPECIALS: &str = "!#$%&'*+/=?^_`{|}~-";

const MAX_LOCAL_LEN: usize = 64;
const MAX_LABEL_LEN: usize = 63;

/// Syntactic e-mail check: `local@domain`, dot-separated atoms on the left,
/// hostname labels on the right. A single-label domain is accepted.
pub fn is_well_formed_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else { return false };
    local_part_ok(local) && domain_ok(domain)
}

fn local_part_ok(local: &str) -> bool {
    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        return false;
    }
    local.split('.').all(|atom| {
        !atom.is_empty()
            && atom
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || LOCAL_SPECIALS.contains(c) || !c.is_ascii())
    })
}

fn domain_ok(domain: &str) -> bool {
    if domain.is_empty() {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || !c.is_ascii())
    })
}
