use async_graphql::*;
use chrono::{DateTime, Utc};

use crate::database::entities::profiles;
use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::StructuredError;
use crate::graphql::global_id::{decode_id, decode_ids, decode_optional_id, to_global_id};
use crate::graphql::types::{AddressNode, GenderNode, TagNode, UserNode};
use crate::services::{NewProfile, ProfileChanges, ProfileFilter};

pub struct ProfileNode(pub profiles::Model);

impl ProfileNode {
    pub const TYPE_NAME: &'static str = "ProfileNode";
}

impl From<profiles::Model> for ProfileNode {
    fn from(model: profiles::Model) -> Self {
        Self(model)
    }
}

#[Object]
impl ProfileNode {
    pub async fn id(&self) -> ID {
        to_global_id(Self::TYPE_NAME, self.0.id)
    }

    async fn target_user(&self, ctx: &Context<'_>) -> Result<UserNode> {
        let context = ctx.data::<GraphQLContext>()?;
        let user = context
            .account_service
            .get(self.0.target_user_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(UserNode::from(user))
    }

    async fn telephone_number(&self) -> &str {
        &self.0.telephone_number
    }

    async fn profile_name(&self) -> &str {
        &self.0.profile_name
    }

    async fn profile_text(&self) -> &str {
        &self.0.profile_text
    }

    async fn is_college_student(&self) -> bool {
        self.0.is_college_student
    }

    async fn school_name(&self) -> &str {
        &self.0.school_name
    }

    async fn age(&self) -> Option<i32> {
        self.0.age
    }

    /// Path of the avatar relative to `/media`
    async fn profile_image(&self) -> Option<&str> {
        self.0.profile_image.as_deref()
    }

    async fn undergraduate(&self) -> Option<&str> {
        self.0.undergraduate.as_deref()
    }

    async fn department(&self) -> Option<&str> {
        self.0.department.as_deref()
    }

    async fn club_activities(&self) -> Option<&str> {
        self.0.club_activities.as_deref()
    }

    async fn admission_format(&self) -> Option<&str> {
        self.0.admission_format.as_deref()
    }

    async fn favorite_subject(&self) -> Option<&str> {
        self.0.favorite_subject.as_deref()
    }

    async fn want_hear(&self) -> Option<&str> {
        self.0.want_hear.as_deref()
    }

    async fn problem(&self) -> Option<&str> {
        self.0.problem.as_deref()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn selected_gender(&self, ctx: &Context<'_>) -> Result<Option<GenderNode>> {
        let Some(gender_id) = self.0.selected_gender_id else {
            return Ok(None);
        };
        let context = ctx.data::<GraphQLContext>()?;
        let gender = context
            .lookup_service
            .find_gender(gender_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(gender.map(GenderNode::from))
    }

    async fn selected_address(&self, ctx: &Context<'_>) -> Result<Option<AddressNode>> {
        let Some(address_id) = self.0.selected_address_id else {
            return Ok(None);
        };
        let context = ctx.data::<GraphQLContext>()?;
        let address = context
            .lookup_service
            .find_address(address_id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(address.map(AddressNode::from))
    }

    /// Requires a login, as `allTags` does
    async fn tags(&self, ctx: &Context<'_>) -> Result<Vec<TagNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        context.require_user(ctx)?;
        let tags = context
            .profile_service
            .tags(self.0.id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(tags.into_iter().map(TagNode::from).collect())
    }

    async fn following_users(&self, ctx: &Context<'_>) -> Result<Vec<UserNode>> {
        let context = ctx.data::<GraphQLContext>()?;
        let users = context
            .profile_service
            .following_users(self.0.id)
            .await
            .map_err(StructuredError::from_core_error)?;

        Ok(users.into_iter().map(UserNode::from).collect())
    }
}

#[derive(InputObject, Default)]
pub struct ProfileFilterInput {
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
    pub selected_address: Option<ID>,
    pub selected_gender: Option<ID>,
}

impl ProfileFilterInput {
    pub fn into_filter(self) -> Result<ProfileFilter> {
        Ok(ProfileFilter {
            selected_address_id: decode_optional_id(
                self.selected_address.as_ref(),
                AddressNode::TYPE_NAME,
                "selectedAddress",
            )?,
            selected_gender_id: decode_optional_id(
                self.selected_gender.as_ref(),
                GenderNode::TYPE_NAME,
                "selectedGender",
            )?,
            target_user_is_active: self.target_user_is_active,
            profile_name: self.profile_name,
            profile_name_icontains: self.profile_name_icontains,
            profile_text: self.profile_text,
            profile_text_icontains: self.profile_text_icontains,
            age: self.age,
            is_college_student: self.is_college_student,
            school_name: self.school_name,
            school_name_icontains: self.school_name_icontains,
            undergraduate: self.undergraduate,
            undergraduate_icontains: self.undergraduate_icontains,
            department: self.department,
            department_icontains: self.department_icontains,
            club_activities: self.club_activities,
            club_activities_icontains: self.club_activities_icontains,
            admission_format: self.admission_format,
            admission_format_icontains: self.admission_format_icontains,
            favorite_subject: self.favorite_subject,
            favorite_subject_icontains: self.favorite_subject_icontains,
            want_hear: self.want_hear,
            want_hear_icontains: self.want_hear_icontains,
            problem: self.problem,
            problem_icontains: self.problem_icontains,
        })
    }
}

#[derive(InputObject)]
pub struct CreateProfileInput {
    pub target_user_id: ID,
    pub profile_name: String,
    pub is_college_student: bool,
    pub school_name: String,
    pub profile_text: Option<String>,
    pub age: Option<i32>,
    pub selected_gender: Option<ID>,
    pub selected_address: Option<ID>,
    pub telephone_number: Option<String>,
    pub want_hear: Option<String>,
    pub problem: Option<String>,
    pub undergraduate: Option<String>,
    pub department: Option<String>,
    pub club_activities: Option<String>,
    pub admission_format: Option<String>,
    pub favorite_subject: Option<String>,
    pub profile_image: Option<Upload>,
    pub client_mutation_id: Option<String>,
}

impl CreateProfileInput {
    /// Splits the input into the service request and the optional upload.
    pub fn into_parts(self) -> Result<(NewProfile, Option<Upload>)> {
        let profile = NewProfile {
            target_user_id: decode_id(&self.target_user_id, UserNode::TYPE_NAME, "targetUserId")?,
            selected_gender_id: decode_optional_id(
                self.selected_gender.as_ref(),
                GenderNode::TYPE_NAME,
                "selectedGender",
            )?,
            selected_address_id: decode_optional_id(
                self.selected_address.as_ref(),
                AddressNode::TYPE_NAME,
                "selectedAddress",
            )?,
            profile_name: self.profile_name,
            is_college_student: self.is_college_student,
            school_name: self.school_name,
            profile_text: self.profile_text,
            age: self.age,
            telephone_number: self.telephone_number,
            want_hear: self.want_hear,
            problem: self.problem,
            undergraduate: self.undergraduate,
            department: self.department,
            club_activities: self.club_activities,
            admission_format: self.admission_format,
            favorite_subject: self.favorite_subject,
        };
        Ok((profile, self.profile_image))
    }
}

#[derive(InputObject)]
pub struct UpdateProfileInput {
    pub id: ID,
    pub profile_name: String,
    pub selected_gender: ID,
    pub selected_address: ID,
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
    /// Replaces the followed users when given
    pub following_users: Option<Vec<ID>>,
    /// Replaces the tag set when given
    pub tags: Option<Vec<ID>>,
    pub profile_image: Option<Upload>,
    pub client_mutation_id: Option<String>,
}

impl UpdateProfileInput {
    /// Returns the profile pk, the changes and the optional upload.
    pub fn into_parts(self) -> Result<(i32, ProfileChanges, Option<Upload>)> {
        let profile_id = decode_id(&self.id, ProfileNode::TYPE_NAME, "id")?;
        let following_user_ids = self
            .following_users
            .as_deref()
            .map(|ids| decode_ids(ids, UserNode::TYPE_NAME, "followingUsers"))
            .transpose()?;
        let tag_ids = self
            .tags
            .as_deref()
            .map(|ids| decode_ids(ids, TagNode::TYPE_NAME, "tags"))
            .transpose()?;

        let changes = ProfileChanges {
            selected_gender_id: decode_id(&self.selected_gender, GenderNode::TYPE_NAME, "selectedGender")?,
            selected_address_id: decode_id(
                &self.selected_address,
                AddressNode::TYPE_NAME,
                "selectedAddress",
            )?,
            profile_name: self.profile_name,
            profile_text: self.profile_text,
            is_college_student: self.is_college_student,
            school_name: self.school_name,
            age: self.age,
            telephone_number: self.telephone_number,
            want_hear: self.want_hear,
            problem: self.problem,
            undergraduate: self.undergraduate,
            department: self.department,
            club_activities: self.club_activities,
            admission_format: self.admission_format,
            favorite_subject: self.favorite_subject,
            following_user_ids,
            tag_ids,
        };
        Ok((profile_id, changes, self.profile_image))
    }
}

#[derive(SimpleObject)]
pub struct ProfilePayload {
    pub profile: Option<ProfileNode>,
    pub client_mutation_id: Option<String>,
}
