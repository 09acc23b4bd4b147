use chrono::Local;

use super::{ContactsDb, fail, int_column, text_column};
use crate::error::{ContactsDbError, DataAccessError, Operation};
use crate::models::{ContactDetails, ContactSummary};
use crate::types::RowValues;

const INSERT_CONTACT: &str =
    "INSERT INTO contact (cid, cname, cnumber, lid, date) VALUES (?, ?, ?, ?, ?)";
const SELECT_CONTACTS_BY_OWNER: &str = "SELECT cid, cname, cnumber FROM contact WHERE lid = ?";
const SELECT_CONTACT_BY_ID: &str = "SELECT cname, cnumber FROM contact WHERE cid = ?";
const UPDATE_CONTACT: &str = "UPDATE contact SET cname = ?, cnumber = ? WHERE cid = ?";
const DELETE_CONTACT: &str = "DELETE FROM contact WHERE cid = ?";

impl ContactsDb {
    /// Insert a contact for `owner_id`, dated today.
    ///
    /// # Errors
    /// Returns `DataAccessError` if the insert fails, e.g. a duplicate contact id or an
    /// owner that does not exist.
    pub async fn save_contact(
        &self,
        contact_id: &str,
        name: &str,
        number: i64,
        owner_id: &str,
    ) -> Result<(), DataAccessError> {
        let op = Operation::SaveContact;
        let Some(mut conn) = self.checkout(op).await? else {
            return Ok(());
        };
        let params = [
            RowValues::from(contact_id),
            RowValues::from(name),
            RowValues::Int(number),
            RowValues::from(owner_id),
            RowValues::Date(Local::now().date_naive()),
        ];
        conn.execute_dml(INSERT_CONTACT, &params)
            .await
            .map_err(fail(op))?;
        Ok(())
    }

    /// All contacts owned by `owner_id`, in the order the database returns them.
    ///
    /// # Errors
    /// Returns `DataAccessError` if the query fails or a row cannot be decoded.
    pub async fn list_contacts(
        &self,
        owner_id: &str,
    ) -> Result<Vec<ContactSummary>, DataAccessError> {
        let op = Operation::ListContacts;
        let Some(mut conn) = self.checkout(op).await? else {
            return Ok(Vec::new());
        };
        let rs = conn
            .execute_select(SELECT_CONTACTS_BY_OWNER, &[RowValues::from(owner_id)])
            .await
            .map_err(fail(op))?;

        rs.results
            .iter()
            .map(|row| -> Result<ContactSummary, ContactsDbError> {
                Ok(ContactSummary {
                    id: text_column(row, "cid")?,
                    name: text_column(row, "cname")?,
                    number: int_column(row, "cnumber")?,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(fail(op))
    }

    /// # Errors
    /// Returns `DataAccessError` if the query fails or the row cannot be decoded.
    pub async fn get_contact(
        &self,
        contact_id: &str,
    ) -> Result<Option<ContactDetails>, DataAccessError> {
        let op = Operation::GetContact;
        let Some(mut conn) = self.checkout(op).await? else {
            return Ok(None);
        };
        let rs = conn
            .execute_select(SELECT_CONTACT_BY_ID, &[RowValues::from(contact_id)])
            .await
            .map_err(fail(op))?;

        rs.first()
            .map(|row| -> Result<ContactDetails, ContactsDbError> {
                Ok(ContactDetails {
                    name: text_column(row, "cname")?,
                    number: int_column(row, "cnumber")?,
                })
            })
            .transpose()
            .map_err(fail(op))
    }

    /// Replace the name and number of a contact. Unknown ids are ignored.
    ///
    /// # Errors
    /// Returns `DataAccessError` if the update fails.
    pub async fn update_contact(
        &self,
        contact_id: &str,
        name: &str,
        number: i64,
    ) -> Result<(), DataAccessError> {
        let op = Operation::UpdateContact;
        let Some(mut conn) = self.checkout(op).await? else {
            return Ok(());
        };
        let params = [
            RowValues::from(name),
            RowValues::Int(number),
            RowValues::from(contact_id),
        ];
        let changed = conn
            .execute_dml(UPDATE_CONTACT, &params)
            .await
            .map_err(fail(op))?;
        if changed == 0 {
            tracing::debug!(contact_id, "update matched no contact");
        }
        Ok(())
    }

    /// Delete a contact. Unknown ids are ignored.
    ///
    /// # Errors
    /// Returns `DataAccessError` if the delete fails.
    pub async fn delete_contact(&self, contact_id: &str) -> Result<(), DataAccessError> {
        let op = Operation::DeleteContact;
        let Some(mut conn) = self.checkout(op).await? else {
            return Ok(());
        };
        let changed = conn
            .execute_dml(DELETE_CONTACT, &[RowValues::from(contact_id)])
            .await
            .map_err(fail(op))?;
        if changed == 0 {
            tracing::debug!(contact_id, "delete matched no contact");
        }
        Ok(())
    }
}
