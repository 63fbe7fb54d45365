//! Member repository.

use crate::error::LibraryResult;
use crate::model::member::{Member, MemberId};
use crate::model::validation::require_text;
use crate::repo::codec::{ensure_connection_ready, parse_uuid};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const MEMBER_SELECT_SQL: &str = "SELECT uuid, name, contact FROM members";

/// Repository interface for borrowers.
pub trait MemberRepository {
    fn create_member(&self, name: &str, contact: &str) -> LibraryResult<Member>;
    fn get_member(&self, id: MemberId) -> LibraryResult<Option<Member>>;
    /// Lists members by name (case-insensitive), then id.
    fn list_members(&self) -> LibraryResult<Vec<Member>>;
}

/// SQLite-backed member repository.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> LibraryResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn create_member(&self, name: &str, contact: &str) -> LibraryResult<Member> {
        let member = Member {
            uuid: Uuid::new_v4(),
            name: require_text("name", name)?,
            contact: contact.trim().to_string(),
        };
        self.conn.execute(
            "INSERT INTO members (uuid, name, contact) VALUES (?1, ?2, ?3);",
            params![
                member.uuid.to_string(),
                member.name.as_str(),
                member.contact.as_str()
            ],
        )?;
        Ok(member)
    }

    fn get_member(&self, id: MemberId) -> LibraryResult<Option<Member>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMBER_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_member_row(row)?));
        }
        Ok(None)
    }

    fn list_members(&self) -> LibraryResult<Vec<Member>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBER_SELECT_SQL} ORDER BY name COLLATE NOCASE ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }
        Ok(members)
    }
}

fn parse_member_row(row: &Row<'_>) -> LibraryResult<Member> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Member {
        uuid: parse_uuid(&uuid_text, "members.uuid")?,
        name: row.get("name")?,
        contact: row.get("contact")?,
    })
}
