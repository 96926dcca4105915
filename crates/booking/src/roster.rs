//! Read-only occupancy view of classes.

use db::{
    class::{self, ClassWithRoster},
    reservation, user, waitlist_entry, ConnectionTrait, DbErr, EntityTrait, QueryOrder,
};

/// Teacher summary attached to a class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub username: String,
}

impl From<user::Model> for Teacher {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
        }
    }
}

/// Occupancy of a single class.
#[derive(Clone, Debug)]
pub struct ClassRoster {
    pub class: class::Model,
    pub teacher: Option<Teacher>,
    pub confirmed: Vec<reservation::Model>,
    pub waitlist: Vec<waitlist_entry::Model>,
}

impl ClassRoster {
    fn new(roster: ClassWithRoster, teacher: Option<user::Model>) -> Self {
        Self {
            class: roster.class,
            teacher: teacher.map(Teacher::from),
            confirmed: roster.confirmed,
            waitlist: roster.waitlist,
        }
    }

    /// Count of confirmed reservations.
    pub fn confirmed_reservations(&self) -> u64 {
        self.confirmed.len() as u64
    }

    /// Count of seats that can still be booked without joining the waitlist.
    pub fn available_spots(&self) -> u64 {
        u64::try_from(self.class.capacity)
            .unwrap_or_default()
            .saturating_sub(self.confirmed_reservations())
    }

    /// Count of users on the waitlist.
    pub fn waitlist_count(&self) -> u64 {
        self.waitlist.len() as u64
    }
}

/// Get occupancy of a single class.
pub async fn roster<C: ConnectionTrait>(
    db: &C,
    class_id: i64,
) -> Result<Option<ClassRoster>, DbErr> {
    let Some(roster) = class::find_with_roster(db, class_id).await? else {
        return Ok(None);
    };

    let teacher = user::Entity::find_by_id(roster.class.teacher_id)
        .one(db)
        .await?;

    Ok(Some(ClassRoster::new(roster, teacher)))
}

/// Get occupancy of every class, ordered by class date.
pub async fn rosters<C: ConnectionTrait>(db: &C) -> Result<Vec<ClassRoster>, DbErr> {
    let classes = class::Entity::find()
        .find_also_related(user::Entity)
        .order_by_asc(class::Column::Date)
        .order_by_asc(class::Column::Id)
        .all(db)
        .await?;

    let mut rosters = Vec::with_capacity(classes.len());

    for (class, teacher) in classes {
        let roster = class::load_roster(db, class).await?;
        rosters.push(ClassRoster::new(roster, teacher));
    }

    Ok(rosters)
}

#[cfg(test)]
mod tests {
    use common::config::RebookingPolicy;

    use super::{roster, rosters};
    use crate::{
        book::book,
        testing::{create_class, create_database, create_user},
    };

    #[tokio::test]
    async fn occupancy() {
        let db = create_database().await;

        let teacher = create_user(&db, "teacher").await;
        let full = create_class(&db, teacher, 1).await;
        let empty = create_class(&db, teacher, 3).await;

        for name in ["first", "second", "third"] {
            let user_id = create_user(&db, name).await;
            book(&db, full, user_id, RebookingPolicy::Forbid)
                .await
                .unwrap();
        }

        let full_roster = roster(&db, full).await.unwrap().unwrap();

        assert_eq!(full_roster.confirmed_reservations(), 1);
        assert_eq!(full_roster.available_spots(), 0);
        assert_eq!(full_roster.waitlist_count(), 2);
        assert_eq!(
            full_roster
                .waitlist
                .iter()
                .map(|entry| entry.position)
                .collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(
            full_roster.teacher.as_ref().map(|t| t.username.as_str()),
            Some("teacher")
        );

        let all = rosters(&db).await.unwrap();

        assert_eq!(all.len(), 2);

        let empty_roster = all.iter().find(|r| r.class.id == empty).unwrap();
        assert_eq!(empty_roster.available_spots(), 3);
        assert_eq!(empty_roster.waitlist_count(), 0);

        assert!(roster(&db, empty + 1).await.unwrap().is_none());
    }
}
