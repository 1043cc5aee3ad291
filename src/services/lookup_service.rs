use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::database::entities::{addresses, genders, tags};
use crate::errors::{CoreError, CoreResult};
use crate::services::listing::{filter_text, paginate, Page, PageWindow};
use crate::services::validation::{max_chars, not_blank};

const MAX_TAG_LEN: usize = 100;
const MAX_GENDER_LEN: usize = 100;
const MAX_ADDRESS_LEN: usize = 200;

/// Exact and substring match on a lookup name.
#[derive(Clone, Debug, Default)]
pub struct NameFilter {
    pub exact: Option<String>,
    pub icontains: Option<String>,
}

/// Tags, genders and addresses that profiles pick from
#[derive(Clone)]
pub struct LookupService {
    db: DatabaseConnection,
}

impl LookupService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_tag(&self, name: &str) -> CoreResult<tags::Model> {
        let name = checked_name("tagName", name, MAX_TAG_LEN)?;
        if self.find_tag_by_name(&name).await?.is_some() {
            return Err(CoreError::conflict(format!("Tag '{}' already exists", name)));
        }

        let tag = tags::ActiveModel {
            id: ActiveValue::NotSet,
            tag_name: Set(name),
        }
        .insert(&self.db)
        .await?;
        info!("Created tag {} ({})", tag.id, tag.tag_name);
        Ok(tag)
    }

    pub async fn create_gender(&self, name: &str) -> CoreResult<genders::Model> {
        let name = checked_name("genderName", name, MAX_GENDER_LEN)?;
        if self.find_gender_by_name(&name).await?.is_some() {
            return Err(CoreError::conflict(format!("Gender '{}' already exists", name)));
        }

        let gender = genders::ActiveModel {
            id: ActiveValue::NotSet,
            gender_name: Set(name),
        }
        .insert(&self.db)
        .await?;
        info!("Created gender {} ({})", gender.id, gender.gender_name);
        Ok(gender)
    }

    pub async fn create_address(&self, name: &str) -> CoreResult<addresses::Model> {
        let name = checked_name("addressName", name, MAX_ADDRESS_LEN)?;
        if self.find_address_by_name(&name).await?.is_some() {
            return Err(CoreError::conflict(format!("Address '{}' already exists", name)));
        }

        let address = addresses::ActiveModel {
            id: ActiveValue::NotSet,
            address_name: Set(name),
        }
        .insert(&self.db)
        .await?;
        info!("Created address {} ({})", address.id, address.address_name);
        Ok(address)
    }

    pub async fn find_tag_by_name(&self, name: &str) -> CoreResult<Option<tags::Model>> {
        Ok(tags::Entity::find()
            .filter(tags::Column::TagName.eq(name))
            .one(&self.db)
            .await?)
    }

    pub async fn find_gender_by_name(&self, name: &str) -> CoreResult<Option<genders::Model>> {
        Ok(genders::Entity::find()
            .filter(genders::Column::GenderName.eq(name))
            .one(&self.db)
            .await?)
    }

    pub async fn find_address_by_name(&self, name: &str) -> CoreResult<Option<addresses::Model>> {
        Ok(addresses::Entity::find()
            .filter(addresses::Column::AddressName.eq(name))
            .one(&self.db)
            .await?)
    }

    pub async fn tag(&self, id: i32) -> CoreResult<tags::Model> {
        self.find_tag(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Tag", id.to_string()))
    }

    pub async fn find_tag(&self, id: i32) -> CoreResult<Option<tags::Model>> {
        Ok(tags::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn gender(&self, id: i32) -> CoreResult<genders::Model> {
        self.find_gender(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Gender", id.to_string()))
    }

    pub async fn find_gender(&self, id: i32) -> CoreResult<Option<genders::Model>> {
        Ok(genders::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn address(&self, id: i32) -> CoreResult<addresses::Model> {
        self.find_address(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Address", id.to_string()))
    }

    pub async fn find_address(&self, id: i32) -> CoreResult<Option<addresses::Model>> {
        Ok(addresses::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list_tags(&self, filter: NameFilter, window: PageWindow) -> CoreResult<Page<tags::Model>> {
        let select = filter_text(
            tags::Entity::find().order_by_asc(tags::Column::Id),
            tags::Column::TagName,
            filter.exact,
            filter.icontains,
        );
        paginate(&self.db, select, &window).await
    }

    pub async fn list_genders(&self, filter: NameFilter, window: PageWindow) -> CoreResult<Page<genders::Model>> {
        let select = filter_text(
            genders::Entity::find().order_by_asc(genders::Column::Id),
            genders::Column::GenderName,
            filter.exact,
            filter.icontains,
        );
        paginate(&self.db, select, &window).await
    }

    pub async fn list_addresses(
        &self,
        filter: NameFilter,
        window: PageWindow,
    ) -> CoreResult<Page<addresses::Model>> {
        let select = filter_text(
            addresses::Entity::find().order_by_asc(addresses::Column::Id),
            addresses::Column::AddressName,
            filter.exact,
            filter.icontains,
        );
        paginate(&self.db, select, &window).await
    }
}

fn checked_name(field: &str, name: &str, max: usize) -> CoreResult<String> {
    let name = name.trim();
    not_blank(field, name)?;
    max_chars(field, name, max)?;
    Ok(name.to_string())
}
