//! Classification values a profile can point at: tags, genders and addresses.

use async_graphql::*;

use crate::database::entities::{addresses, genders, tags};
use crate::graphql::global_id::to_global_id;
use crate::services::NameFilter;

pub struct TagNode(pub tags::Model);

impl TagNode {
    pub const TYPE_NAME: &'static str = "TagNode";
}

impl From<tags::Model> for TagNode {
    fn from(model: tags::Model) -> Self {
        Self(model)
    }
}

#[Object]
impl TagNode {
    pub async fn id(&self) -> ID {
        to_global_id(Self::TYPE_NAME, self.0.id)
    }

    async fn tag_name(&self) -> &str {
        &self.0.tag_name
    }
}

pub struct GenderNode(pub genders::Model);

impl GenderNode {
    pub const TYPE_NAME: &'static str = "GenderNode";
}

impl From<genders::Model> for GenderNode {
    fn from(model: genders::Model) -> Self {
        Self(model)
    }
}

#[Object]
impl GenderNode {
    pub async fn id(&self) -> ID {
        to_global_id(Self::TYPE_NAME, self.0.id)
    }

    async fn gender_name(&self) -> &str {
        &self.0.gender_name
    }
}

pub struct AddressNode(pub addresses::Model);

impl AddressNode {
    pub const TYPE_NAME: &'static str = "AddressNode";
}

impl From<addresses::Model> for AddressNode {
    fn from(model: addresses::Model) -> Self {
        Self(model)
    }
}

#[Object]
impl AddressNode {
    pub async fn id(&self) -> ID {
        to_global_id(Self::TYPE_NAME, self.0.id)
    }

    async fn address_name(&self) -> &str {
        &self.0.address_name
    }
}

#[derive(InputObject, Default)]
pub struct TagFilterInput {
    pub tag_name: Option<String>,
    pub tag_name_icontains: Option<String>,
}

impl From<TagFilterInput> for NameFilter {
    fn from(input: TagFilterInput) -> Self {
        Self {
            exact: input.tag_name,
            icontains: input.tag_name_icontains,
        }
    }
}

#[derive(InputObject, Default)]
pub struct GenderFilterInput {
    pub gender_name: Option<String>,
    pub gender_name_icontains: Option<String>,
}

impl From<GenderFilterInput> for NameFilter {
    fn from(input: GenderFilterInput) -> Self {
        Self {
            exact: input.gender_name,
            icontains: input.gender_name_icontains,
        }
    }
}

#[derive(InputObject, Default)]
pub struct AddressFilterInput {
    pub address_name: Option<String>,
    pub address_name_icontains: Option<String>,
}

impl From<AddressFilterInput> for NameFilter {
    fn from(input: AddressFilterInput) -> Self {
        Self {
            exact: input.address_name,
            icontains: input.address_name_icontains,
        }
    }
}

/// Input shared by the staff-only classification mutations.
#[derive(InputObject)]
pub struct CreateLookupInput {
    pub name: String,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct CreateTagPayload {
    pub tag: Option<TagNode>,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct CreateGenderPayload {
    pub gender: Option<GenderNode>,
    pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct CreateAddressPayload {
    pub address: Option<AddressNode>,
    pub client_mutation_id: Option<String>,
}
