use crumpet::{db::Builder, schema::ModelBuilder, Db, Entity, Model, Result};

use std::sync::atomic::{AtomicUsize, Ordering};

pub struct User;
pub struct Profile;
pub struct Post;
pub struct Comment;
pub struct Tag;
pub struct Account;

impl Model for User {
    const NAME: &'static str = "User";

    fn declare(model: &mut ModelBuilder) {
        model.has_one::<Profile>("profile");
        model.has_many::<Post>("posts").after(["profile"]);
    }
}

impl Model for Profile {
    const NAME: &'static str = "Profile";

    fn declare(model: &mut ModelBuilder) {
        model.belongs_to::<User>("user");
    }
}

impl Model for Post {
    const NAME: &'static str = "Post";

    fn declare(model: &mut ModelBuilder) {
        model.fillable(["title", "body", "user_id"]);
        model.belongs_to::<User>("author").foreign_key("user_id");
        model.has_many::<Comment>("comments");
        model
            .has_many_and_belongs_to::<Tag>("tags")
            .with_timestamps();
    }
}

impl Model for Comment {
    const NAME: &'static str = "Comment";

    fn declare(model: &mut ModelBuilder) {
        model.belongs_to::<Post>("post");
    }
}

impl Model for Tag {
    const NAME: &'static str = "Tag";

    fn declare(model: &mut ModelBuilder) {
        model.timestamps();
        model.has_many_and_belongs_to::<Post>("posts");
    }
}

pub static ACCOUNTS_DELETED: AtomicUsize = AtomicUsize::new(0);

impl Model for Account {
    const NAME: &'static str = "Account";

    fn saving(entity: &mut Entity) -> Result<()> {
        match entity.get("name").and_then(|name| name.as_str()) {
            Some("") | None => crumpet::bail!("account name is required"),
            Some(name) => {
                let name = name.trim().to_string();
                entity.set("name", name);
                Ok(())
            }
        }
    }

    fn deleted(_: &Entity) -> Result<()> {
        ACCOUNTS_DELETED.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn builder() -> Builder {
    let mut builder = Db::builder();
    builder
        .register::<User>()
        .register::<Profile>()
        .register::<Post>()
        .register::<Comment>()
        .register::<Tag>()
        .register::<Account>();
    builder
}
