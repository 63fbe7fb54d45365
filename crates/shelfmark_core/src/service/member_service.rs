//! Member use-case service.

use crate::error::LibraryResult;
use crate::model::member::{Member, MemberId};
use crate::repo::member_repo::MemberRepository;
use log::info;

pub struct MemberService<R: MemberRepository> {
    repo: R,
}

impl<R: MemberRepository> MemberService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a borrower. Names need not be unique.
    pub fn add_member(&self, name: &str, contact: &str) -> LibraryResult<Member> {
        let member = self.repo.create_member(name, contact)?;
        info!(
            "event=member_add module=members status=ok member_id={}",
            member.uuid
        );
        Ok(member)
    }

    pub fn get_member(&self, id: MemberId) -> LibraryResult<Option<Member>> {
        self.repo.get_member(id)
    }

    pub fn list_members(&self) -> LibraryResult<Vec<Member>> {
        self.repo.list_members()
    }
}
