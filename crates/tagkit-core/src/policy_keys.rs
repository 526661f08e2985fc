//! Entity classification keys used by the tag policy store.
//!
//! Policy rows are keyed by a choice value, not by entity name. System
//! entities have fixed names; custom entities carry the deployment's schema
//! prefix, so they are matched on the name with the prefix stripped.

use serde::{Deserialize, Serialize};

use crate::models::SchemaNames;

/// Choice value identifying an entity in the tag policy store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolicyKey(pub u32);

impl std::fmt::Display for PolicyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn system_key(logical_name: &str) -> Option<u32> {
    let key = match logical_name {
        "account" => 0,
        "contact" => 1,
        "appointment" => 3,
        "activitypointer" => 4,
        "transactioncurrency" => 5,
        "email" => 6,
        "mailbox" => 7,
        "phonecall" => 8,
        "queue" => 9,
        "task" => 10,
        "team" => 11,
        "systemuser" => 12,
        _ => return None,
    };
    Some(key)
}

fn custom_key(unprefixed: &str) -> Option<u32> {
    let key = match unprefixed {
        "case" => 2,
        "approvalsteps" => 13,
        "approvaltemplate" => 14,
        "approvaltemplatesteps" => 15,
        "calendar" => 16,
        "case_contact" => 17,
        "casecategory" => 18,
        "casepriority" => 19,
        "caseresolution" => 20,
        "caseseverity" => 21,
        "casesource" => 22,
        "casesubstatus" => 23,
        "domain" => 24,
        "emailtemplatelookup" => 25,
        "follow" => 26,
        "holiday" => 27,
        "item" => 28,
        "itemcategory" => 29,
        "itemkit" => 30,
        "itemvendor" => 31,
        "knowledgearticle" => 32,
        // Truncated intersect-entity names as registered in the choice set.
        "knowledgearticle_evergr" => 33,
        "knowledgearticleattachm" => 34,
        "knowledgearticletemplat" => 35,
        "knowledgecategory" => 36,
        "notificationconfig" => 37,
        "notificationdynamicsub" => 38,
        "notificationstatus" => 39,
        "notificationstatustrans" => 40,
        "notificationsub" => 41,
        "notificationtrigger" => 42,
        "paymentterms" => 43,
        "pricelist" => 44,
        "pricelistproduct" => 45,
        "product" => 46,
        "service" => 47,
        "servicecategory" => 48,
        "servicevendor" => 49,
        "skill" => 50,
        "skillcategory" => 51,
        "skilllevel" => 52,
        "skillvendor" => 53,
        "spamemailtracking" => 54,
        "survey" => 55,
        "surveycategory" => 56,
        "surveydefinition" => 57,
        "surveydefinitionversion" => 58,
        "surveyquestion" => 59,
        "surveyresponse" => 60,
        "systemconfig" => 61,
        "tagdefinition" => 62,
        "tagsettings" => 63,
        "taxexemption" => 64,
        "taxrate" => 65,
        "taxrateadjustment" => 66,
        "taxrateassociation" => 67,
        "unitofmeasure" => 68,
        "workschedule" => 69,
        _ => return None,
    };
    Some(key)
}

/// Resolve an entity logical name to its policy key.
///
/// Returns `None` for entities the policy store has no classification for.
pub fn policy_key(schema: &SchemaNames, logical_name: &str) -> Option<PolicyKey> {
    let name = logical_name.trim();
    system_key(name)
        .or_else(|| schema.strip(name).and_then(custom_key))
        .map(PolicyKey)
}
