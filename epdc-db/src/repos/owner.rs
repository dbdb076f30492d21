//! Owner of phone and email rows
//!
//! Phones and emails hang off either a company or a contact through a
//! nullable owner column. The column name is picked from the enum, never
//! from input, so it is safe to splice into SQL.

use sqlx::PgConnection;

use super::{email, phone, DbError, Email, Phone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Company(i64),
    Contact(i64),
}

impl Owner {
    /// Owner column on `phones` / `emails`
    pub fn column(self) -> &'static str {
        match self {
            Owner::Company(_) => "company_id",
            Owner::Contact(_) => "contact_id",
        }
    }

    pub fn id(self) -> i64 {
        match self {
            Owner::Company(id) | Owner::Contact(id) => id,
        }
    }

    /// `(company_id, contact_id)` bind values for an insert
    pub(crate) fn columns(self) -> (Option<i64>, Option<i64>) {
        match self {
            Owner::Company(id) => (Some(id), None),
            Owner::Contact(id) => (None, Some(id)),
        }
    }
}

/// Store emails, phones and faxes for an owner inside the caller's
/// transaction.
pub(crate) async fn store_children(
    conn: &mut PgConnection,
    owner: Owner,
    emails: &[Email],
    phones: &[Phone],
    faxes: &[Phone],
) -> Result<(), DbError> {
    email::replace_for_owner(&mut *conn, owner, emails).await?;
    phone::sync_for_owner(&mut *conn, owner, false, phones).await?;
    phone::sync_for_owner(&mut *conn, owner, true, faxes).await?;
    Ok(())
}

/// Remove every phone and email of an owner inside the caller's transaction.
pub(crate) async fn delete_children(conn: &mut PgConnection, owner: Owner) -> Result<(), DbError> {
    phone::delete_all_for_owner(&mut *conn, owner).await?;
    email::delete_all_for_owner(&mut *conn, owner).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_owner() {
        assert_eq!(Owner::Company(3).column(), "company_id");
        assert_eq!(Owner::Contact(3).column(), "contact_id");
        assert_eq!(Owner::Company(3).columns(), (Some(3), None));
        assert_eq!(Owner::Contact(9).columns(), (None, Some(9)));
        assert_eq!(Owner::Contact(9).id(), 9);
    }
}
