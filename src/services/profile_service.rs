use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};
use tracing::{debug, info};

use crate::database::entities::{
    addresses, genders, profile_following_users, profile_tags, profiles, tags, users,
};
use crate::errors::{CoreError, CoreResult};
use crate::services::listing::{filter_text, paginate, Page, PageWindow};
use crate::services::media_storage::{settle, MediaStorage, StagedUpload, UploadedFile};
use crate::services::validation::{dedup_ids, digits_only, max_chars, not_blank, optional_max_chars};

const MAX_NAME_LEN: usize = 100;
const MAX_TEXT_LEN: usize = 1000;
const MAX_TELEPHONE_LEN: usize = 11;

/// Fields accepted when a profile is first created.
#[derive(Clone, Debug, Default)]
pub struct NewProfile {
    pub target_user_id: i32,
    pub profile_name: String,
    pub is_college_student: bool,
    pub school_name: String,
    pub profile_text: Option<String>,
    pub age: Option<i32>,
    pub selected_gender_id: Option<i32>,
    pub selected_address_id: Option<i32>,
    pub telephone_number: Option<String>,
    pub want_hear: Option<String>,
    pub problem: Option<String>,
    pub undergraduate: Option<String>,
    pub department: Option<String>,
    pub club_activities: Option<String>,
    pub admission_format: Option<String>,
    pub favorite_subject: Option<String>,
}

/// Profile update. `None` keeps the stored value; `Some` on the
/// relationship lists replaces the whole set.
#[derive(Clone, Debug, Default)]
pub struct ProfileChanges {
    pub profile_name: String,
    pub selected_gender_id: i32,
    pub selected_address_id: i32,
    pub profile_text: Option<String>,
    pub is_college_student: Option<bool>,
    pub school_name: Option<String>,
    pub age: Option<i32>,
    pub telephone_number: Option<String>,
    pub want_hear: Option<String>,
    pub problem: Option<String>,
    pub undergraduate: Option<String>,
    pub department: Option<String>,
    pub club_activities: Option<String>,
    pub admission_format: Option<String>,
    pub favorite_subject: Option<String>,
    pub following_user_ids: Option<Vec<i32>>,
    pub tag_ids: Option<Vec<i32>>,
}

#[derive(Clone, Debug, Default)]
pub struct ProfileFilter {
    pub target_user_is_active: Option<bool>,
    pub profile_name: Option<String>,
    pub profile_name_icontains: Option<String>,
    pub profile_text: Option<String>,
    pub profile_text_icontains: Option<String>,
    pub age: Option<i32>,
    pub is_college_student: Option<bool>,
    pub school_name: Option<String>,
    pub school_name_icontains: Option<String>,
    pub undergraduate: Option<String>,
    pub undergraduate_icontains: Option<String>,
    pub department: Option<String>,
    pub department_icontains: Option<String>,
    pub club_activities: Option<String>,
    pub club_activities_icontains: Option<String>,
    pub admission_format: Option<String>,
    pub admission_format_icontains: Option<String>,
    pub favorite_subject: Option<String>,
    pub favorite_subject_icontains: Option<String>,
    pub want_hear: Option<String>,
    pub want_hear_icontains: Option<String>,
    pub problem: Option<String>,
    pub problem_icontains: Option<String>,
    pub selected_address_id: Option<i32>,
    pub selected_gender_id: Option<i32>,
}

impl ProfileFilter {
    fn apply(self, mut select: Select<profiles::Entity>) -> Select<profiles::Entity> {
        use profiles::Column;

        if let Some(active) = self.target_user_is_active {
            select = select
                .inner_join(users::Entity)
                .filter(users::Column::IsActive.eq(active));
        }
        if let Some(age) = self.age {
            select = select.filter(Column::Age.eq(age));
        }
        if let Some(college) = self.is_college_student {
            select = select.filter(Column::IsCollegeStudent.eq(college));
        }
        if let Some(address) = self.selected_address_id {
            select = select.filter(Column::SelectedAddressId.eq(address));
        }
        if let Some(gender) = self.selected_gender_id {
            select = select.filter(Column::SelectedGenderId.eq(gender));
        }

        select = filter_text(select, Column::ProfileName, self.profile_name, self.profile_name_icontains);
        select = filter_text(select, Column::ProfileText, self.profile_text, self.profile_text_icontains);
        select = filter_text(select, Column::SchoolName, self.school_name, self.school_name_icontains);
        select = filter_text(select, Column::Undergraduate, self.undergraduate, self.undergraduate_icontains);
        select = filter_text(select, Column::Department, self.department, self.department_icontains);
        select = filter_text(
            select,
            Column::ClubActivities,
            self.club_activities,
            self.club_activities_icontains,
        );
        select = filter_text(
            select,
            Column::AdmissionFormat,
            self.admission_format,
            self.admission_format_icontains,
        );
        select = filter_text(
            select,
            Column::FavoriteSubject,
            self.favorite_subject,
            self.favorite_subject_icontains,
        );
        select = filter_text(select, Column::WantHear, self.want_hear, self.want_hear_icontains);
        filter_text(select, Column::Problem, self.problem, self.problem_icontains)
    }
}

/// Profiles, their tag set and followed users
#[derive(Clone)]
pub struct ProfileService {
    db: DatabaseConnection,
    media: MediaStorage,
}

impl ProfileService {
    pub fn new(db: DatabaseConnection, media: MediaStorage) -> Self {
        Self { db, media }
    }

    pub async fn create(&self, input: NewProfile, image: Option<UploadedFile>) -> CoreResult<profiles::Model> {
        validate_new(&input)?;

        users::Entity::find_by_id(input.target_user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("User", input.target_user_id.to_string()))?;

        let existing = profiles::Entity::find()
            .filter(profiles::Column::TargetUserId.eq(input.target_user_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CoreError::conflict(format!(
                "User {} already has a profile",
                input.target_user_id
            )));
        }

        if let Some(gender_id) = input.selected_gender_id {
            ensure_gender(&self.db, gender_id).await?;
        }
        if let Some(address_id) = input.selected_address_id {
            ensure_address(&self.db, address_id).await?;
        }

        let telephone_number = input.telephone_number.unwrap_or_default();
        ensure_telephone_free(&self.db, &telephone_number, None).await?;

        let staged = self
            .stage_avatar(input.target_user_id, &input.profile_name, image)
            .await?;
        let profile_image = staged.as_ref().map(|upload| upload.path().to_string());

        let inserted = profiles::ActiveModel {
            id: ActiveValue::NotSet,
            target_user_id: Set(input.target_user_id),
            telephone_number: Set(telephone_number),
            profile_name: Set(input.profile_name),
            profile_text: Set(input.profile_text.unwrap_or_default()),
            is_college_student: Set(input.is_college_student),
            school_name: Set(input.school_name),
            age: Set(input.age),
            profile_image: Set(profile_image),
            undergraduate: Set(input.undergraduate),
            department: Set(input.department),
            club_activities: Set(input.club_activities),
            admission_format: Set(input.admission_format),
            favorite_subject: Set(input.favorite_subject),
            want_hear: Set(input.want_hear),
            problem: Set(input.problem),
            selected_address_id: Set(input.selected_address_id),
            selected_gender_id: Set(input.selected_gender_id),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(CoreError::from);
        let profile = settle(staged, inserted).await?;

        info!("Created profile {} for user {}", profile.id, profile.target_user_id);
        Ok(profile)
    }

    /// Updates the caller's own profile.
    ///
    /// Scalar fields, tags and followed users are written in one transaction;
    /// an unknown reference leaves the profile untouched.
    pub async fn update(
        &self,
        actor_id: i32,
        profile_id: i32,
        changes: ProfileChanges,
        image: Option<UploadedFile>,
    ) -> CoreResult<profiles::Model> {
        validate_changes(&changes)?;

        let current = self.get(profile_id).await?;
        if current.target_user_id != actor_id {
            return Err(CoreError::forbidden("Only the owner can update this profile"));
        }

        let staged = self.stage_avatar(actor_id, &changes.profile_name, image).await?;
        let new_image = staged.as_ref().map(|upload| upload.path().to_string());

        let updated = self
            .db
            .transaction::<_, profiles::Model, CoreError>(|txn| {
                Box::pin(async move {
                    ensure_gender(txn, changes.selected_gender_id).await?;
                    ensure_address(txn, changes.selected_address_id).await?;
                    if let Some(number) = changes.telephone_number.as_deref() {
                        ensure_telephone_free(txn, number, Some(current.id)).await?;
                    }

                    let tag_ids = match changes.tag_ids {
                        Some(ids) => Some(ensure_tags(txn, dedup_ids(ids)).await?),
                        None => None,
                    };
                    let following_ids = match changes.following_user_ids {
                        Some(ids) => Some(ensure_users(txn, dedup_ids(ids)).await?),
                        None => None,
                    };

                    let mut active = current.into_active_model();
                    active.profile_name = Set(changes.profile_name);
                    active.selected_gender_id = Set(Some(changes.selected_gender_id));
                    active.selected_address_id = Set(Some(changes.selected_address_id));
                    if let Some(text) = changes.profile_text {
                        active.profile_text = Set(text);
                    }
                    if let Some(college) = changes.is_college_student {
                        active.is_college_student = Set(college);
                    }
                    if let Some(school) = changes.school_name {
                        active.school_name = Set(school);
                    }
                    if let Some(age) = changes.age {
                        active.age = Set(Some(age));
                    }
                    if let Some(number) = changes.telephone_number {
                        active.telephone_number = Set(number);
                    }
                    if let Some(value) = changes.want_hear {
                        active.want_hear = Set(Some(value));
                    }
                    if let Some(value) = changes.problem {
                        active.problem = Set(Some(value));
                    }
                    if let Some(value) = changes.undergraduate {
                        active.undergraduate = Set(Some(value));
                    }
                    if let Some(value) = changes.department {
                        active.department = Set(Some(value));
                    }
                    if let Some(value) = changes.club_activities {
                        active.club_activities = Set(Some(value));
                    }
                    if let Some(value) = changes.admission_format {
                        active.admission_format = Set(Some(value));
                    }
                    if let Some(value) = changes.favorite_subject {
                        active.favorite_subject = Set(Some(value));
                    }
                    if let Some(path) = new_image {
                        active.profile_image = Set(Some(path));
                    }
                    let profile = active.update(txn).await?;

                    if let Some(tag_ids) = tag_ids {
                        replace_tags(txn, profile.id, tag_ids).await?;
                    }
                    if let Some(user_ids) = following_ids {
                        replace_following(txn, profile.id, user_ids).await?;
                    }

                    Ok(profile)
                })
            })
            .await
            .map_err(CoreError::from);
        let profile = settle(staged, updated).await?;

        info!("Updated profile {}", profile.id);
        Ok(profile)
    }

    async fn stage_avatar(
        &self,
        user_id: i32,
        profile_name: &str,
        image: Option<UploadedFile>,
    ) -> CoreResult<Option<StagedUpload>> {
        let path = match &image {
            Some(file) => MediaStorage::avatar_path(user_id, profile_name, &file.filename),
            None => return Ok(None),
        };
        self.media.stage(path, image).await
    }

    pub async fn get(&self, id: i32) -> CoreResult<profiles::Model> {
        debug!("Loading profile {}", id);
        profiles::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("Profile", id.to_string()))
    }

    pub async fn find(&self, id: i32) -> CoreResult<Option<profiles::Model>> {
        Ok(profiles::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_by_user(&self, user_id: i32) -> CoreResult<Option<profiles::Model>> {
        Ok(profiles::Entity::find()
            .filter(profiles::Column::TargetUserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    /// Lists profiles, optionally restricted to college or high-school students.
    pub async fn list(
        &self,
        filter: ProfileFilter,
        college_students: Option<bool>,
        window: PageWindow,
    ) -> CoreResult<Page<profiles::Model>> {
        let mut select = profiles::Entity::find().order_by_asc(profiles::Column::Id);
        if let Some(college) = college_students {
            select = select.filter(profiles::Column::IsCollegeStudent.eq(college));
        }
        paginate(&self.db, filter.apply(select), &window).await
    }

    pub async fn tags(&self, profile_id: i32) -> CoreResult<Vec<tags::Model>> {
        let tag_ids: Vec<i32> = profile_tags::Entity::find()
            .filter(profile_tags::Column::ProfileId.eq(profile_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| row.tag_id)
            .collect();

        Ok(tags::Entity::find()
            .filter(tags::Column::Id.is_in(tag_ids))
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn following_users(&self, profile_id: i32) -> CoreResult<Vec<users::Model>> {
        let user_ids: Vec<i32> = profile_following_users::Entity::find()
            .filter(profile_following_users::Column::ProfileId.eq(profile_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| row.user_id)
            .collect();

        Ok(users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids))
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await?)
    }
}

fn validate_new(input: &NewProfile) -> CoreResult<()> {
    not_blank("profileName", &input.profile_name)?;
    max_chars("profileName", &input.profile_name, MAX_NAME_LEN)?;
    max_chars("schoolName", &input.school_name, MAX_NAME_LEN)?;
    optional_max_chars("profileText", input.profile_text.as_deref(), MAX_TEXT_LEN)?;
    validate_telephone(input.telephone_number.as_deref())?;
    validate_age(input.age)?;
    for (field, value) in [
        ("wantHear", &input.want_hear),
        ("problem", &input.problem),
        ("undergraduate", &input.undergraduate),
        ("department", &input.department),
        ("clubActivities", &input.club_activities),
        ("admissionFormat", &input.admission_format),
        ("favoriteSubject", &input.favorite_subject),
    ] {
        optional_max_chars(field, value.as_deref(), MAX_NAME_LEN)?;
    }
    Ok(())
}

fn validate_changes(changes: &ProfileChanges) -> CoreResult<()> {
    not_blank("profileName", &changes.profile_name)?;
    max_chars("profileName", &changes.profile_name, MAX_NAME_LEN)?;
    optional_max_chars("schoolName", changes.school_name.as_deref(), MAX_NAME_LEN)?;
    optional_max_chars("profileText", changes.profile_text.as_deref(), MAX_TEXT_LEN)?;
    validate_telephone(changes.telephone_number.as_deref())?;
    validate_age(changes.age)?;
    for (field, value) in [
        ("wantHear", &changes.want_hear),
        ("problem", &changes.problem),
        ("undergraduate", &changes.undergraduate),
        ("department", &changes.department),
        ("clubActivities", &changes.club_activities),
        ("admissionFormat", &changes.admission_format),
        ("favoriteSubject", &changes.favorite_subject),
    ] {
        optional_max_chars(field, value.as_deref(), MAX_NAME_LEN)?;
    }
    Ok(())
}

fn validate_telephone(number: Option<&str>) -> CoreResult<()> {
    let Some(number) = number else {
        return Ok(());
    };
    max_chars("telephoneNumber", number, MAX_TELEPHONE_LEN)?;
    digits_only("telephoneNumber", number)
}

fn validate_age(age: Option<i32>) -> CoreResult<()> {
    match age {
        Some(age) if !(0..=150).contains(&age) => Err(CoreError::invalid_field(
            "age",
            "must be between 0 and 150",
        )),
        _ => Ok(()),
    }
}

async fn ensure_gender<C: ConnectionTrait>(db: &C, id: i32) -> CoreResult<()> {
    genders::Entity::find_by_id(id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| CoreError::not_found("Gender", id.to_string()))
}

async fn ensure_address<C: ConnectionTrait>(db: &C, id: i32) -> CoreResult<()> {
    addresses::Entity::find_by_id(id)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| CoreError::not_found("Address", id.to_string()))
}

async fn ensure_telephone_free<C: ConnectionTrait>(
    db: &C,
    number: &str,
    own_profile: Option<i32>,
) -> CoreResult<()> {
    if number.is_empty() {
        return Ok(());
    }

    let mut select = profiles::Entity::find().filter(profiles::Column::TelephoneNumber.eq(number));
    if let Some(own) = own_profile {
        select = select.filter(profiles::Column::Id.ne(own));
    }
    if select.one(db).await?.is_some() {
        return Err(CoreError::conflict("Telephone number is already registered")
            .with_fields([("field".to_string(), "telephoneNumber".to_string())].into()));
    }
    Ok(())
}

async fn ensure_tags<C: ConnectionTrait>(db: &C, ids: Vec<i32>) -> CoreResult<Vec<i32>> {
    let found: Vec<i32> = tags::Entity::find()
        .filter(tags::Column::Id.is_in(ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|tag| tag.id)
        .collect();

    match ids.iter().find(|id| !found.contains(*id)) {
        Some(missing) => Err(CoreError::not_found("Tag", missing.to_string())),
        None => Ok(ids),
    }
}

async fn ensure_users<C: ConnectionTrait>(db: &C, ids: Vec<i32>) -> CoreResult<Vec<i32>> {
    let found: Vec<i32> = users::Entity::find()
        .filter(users::Column::Id.is_in(ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|user| user.id)
        .collect();

    match ids.iter().find(|id| !found.contains(*id)) {
        Some(missing) => Err(CoreError::not_found("User", missing.to_string())),
        None => Ok(ids),
    }
}

async fn replace_tags<C: ConnectionTrait>(db: &C, profile_id: i32, tag_ids: Vec<i32>) -> CoreResult<()> {
    profile_tags::Entity::delete_many()
        .filter(profile_tags::Column::ProfileId.eq(profile_id))
        .exec(db)
        .await?;

    if tag_ids.is_empty() {
        return Ok(());
    }

    let rows = tag_ids.into_iter().map(|tag_id| profile_tags::ActiveModel {
        profile_id: Set(profile_id),
        tag_id: Set(tag_id),
    });
    profile_tags::Entity::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

async fn replace_following<C: ConnectionTrait>(db: &C, profile_id: i32, user_ids: Vec<i32>) -> CoreResult<()> {
    profile_following_users::Entity::delete_many()
        .filter(profile_following_users::Column::ProfileId.eq(profile_id))
        .exec(db)
        .await?;

    if user_ids.is_empty() {
        return Ok(());
    }

    let rows = user_ids
        .into_iter()
        .map(|user_id| profile_following_users::ActiveModel {
            profile_id: Set(profile_id),
            user_id: Set(user_id),
        });
    profile_following_users::Entity::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    Ok(())
}
