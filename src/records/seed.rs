// Demo dataset written on first run (3 admins, 10 citizens, 8 applications,
// 10 catalog schemes)
use super::model::{
    Application, ApplicationStatus, Scheme, SchemeStatus, StatusChange, User, UserStatus,
};
use crate::eligibility::EligibilityRules;
use crate::rbac::Role;
use chrono::{DateTime, NaiveDate, Utc};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[allow(clippy::too_many_arguments)]
fn user(
    id: &str,
    full_name: &str,
    email: &str,
    mobile: &str,
    role: Role,
    state: &str,
    status: UserStatus,
    joined_at: Option<NaiveDate>,
) -> User {
    User {
        id: id.to_string(),
        full_name: full_name.to_string(),
        email: email.to_string(),
        mobile: mobile.to_string(),
        role,
        language: "en".to_string(),
        state: Some(state.to_string()),
        status,
        joined_at,
    }
}

pub fn users() -> Vec<User> {
    use UserStatus::{Active, Blocked};

    vec![
        user("u-admin-1", "Super Admin", "admin@schemesarthi.gov.in", "9999999999", Role::SuperAdmin, "central", Active, day(2025, 1, 1)),
        user("u-admin-2", "Content Manager", "content@schemesarthi.gov.in", "9999999998", Role::ContentAdmin, "central", Active, day(2025, 2, 1)),
        user("u-admin-3", "Application Reviewer", "reviewer@schemesarthi.gov.in", "9999999997", Role::ReviewAdmin, "central", Active, day(2025, 3, 1)),
        user("u-demo-1", "Rahul Sharma", "rahul@example.com", "9876543210", Role::User, "maharashtra", Active, day(2025, 8, 12)),
        user("u-demo-2", "Priya Patel", "priya@example.com", "9876543211", Role::User, "gujarat", Active, day(2025, 7, 20)),
        user("u-demo-3", "Amit Singh", "amit@example.com", "9876543212", Role::User, "uttar-pradesh", Blocked, day(2025, 9, 1)),
        user("u-demo-4", "Sneha Reddy", "sneha@example.com", "9876543213", Role::User, "telangana", Active, day(2025, 6, 15)),
        user("u-demo-5", "Vikram Joshi", "vikram@example.com", "9876543214", Role::User, "rajasthan", Active, day(2025, 10, 5)),
        user("u-demo-6", "Kavita Nair", "kavita@example.com", "9876543215", Role::User, "kerala", Active, day(2025, 5, 22)),
        user("u-demo-7", "Rajesh Kumar", "rajesh@example.com", "9876543216", Role::User, "bihar", Active, day(2025, 4, 10)),
        user("u-demo-8", "Anita Desai", "anita@example.com", "9876543217", Role::User, "maharashtra", Blocked, day(2025, 11, 18)),
        user("u-demo-9", "Suresh Yadav", "suresh@example.com", "9876543218", Role::User, "madhya-pradesh", Active, day(2025, 3, 30)),
        user("u-demo-10", "Meera Iyer", "meera@example.com", "9876543219", Role::User, "tamil-nadu", Active, day(2025, 2, 14)),
    ]
}

fn step(status: ApplicationStatus, by: &str, remark: &str, date: DateTime<Utc>) -> StatusChange {
    StatusChange {
        status,
        updated_by: by.to_string(),
        remark: remark.to_string(),
        date,
    }
}

struct Draft<'a> {
    id: &'a str,
    user_id: &'a str,
    service_id: &'a str,
    service_name: &'a str,
    category: &'a str,
    full_name: &'a str,
    mobile: &'a str,
    remarks: &'a str,
    history: Vec<StatusChange>,
}

impl Draft<'_> {
    fn build(self) -> Application {
        let date_applied = self.history.first().map(|h| h.date).unwrap_or_default();
        let last = self.history.last();
        Application {
            id: self.id.to_string(),
            user_id: self.user_id.to_string(),
            service_id: self.service_id.to_string(),
            service_name: self.service_name.to_string(),
            category: self.category.to_string(),
            status: last.map(|h| h.status).unwrap_or(ApplicationStatus::Pending),
            date_applied,
            last_updated: last.map(|h| h.date).unwrap_or(date_applied),
            form_data: serde_json::json!({ "fullName": self.full_name, "mobile": self.mobile }),
            remarks: self.remarks.to_string(),
            status_history: self.history,
        }
    }
}

pub fn applications() -> Vec<Application> {
    use ApplicationStatus::*;

    let submitted = "Application submitted";

    vec![
        Draft {
            id: "APP-2024-001",
            user_id: "u-demo-1",
            service_id: "pm-kisan",
            service_name: "PM Kisan Samman Nidhi",
            category: "agriculture",
            full_name: "Rahul Sharma",
            mobile: "9876543210",
            remarks: "",
            history: vec![step(Pending, "system", submitted, at(2026, 1, 15, 10, 0))],
        },
        Draft {
            id: "APP-2024-002",
            user_id: "u-demo-2",
            service_id: "ayushman-bharat",
            service_name: "Ayushman Bharat Yojana",
            category: "health",
            full_name: "Priya Patel",
            mobile: "9876543211",
            remarks: "All documents verified",
            history: vec![
                step(Pending, "system", submitted, at(2026, 1, 10, 9, 30)),
                step(UnderReview, "u-admin-3", "Picked up for review", at(2026, 1, 15, 10, 0)),
                step(Approved, "u-admin-1", "All documents verified", at(2026, 1, 20, 11, 0)),
            ],
        },
        Draft {
            id: "APP-2024-003",
            user_id: "u-demo-4",
            service_id: "sukanya-samriddhi",
            service_name: "Sukanya Samriddhi Yojana",
            category: "women-empowerment",
            full_name: "Sneha Reddy",
            mobile: "9876543213",
            remarks: "Income exceeds limit",
            history: vec![
                step(Pending, "system", submitted, at(2026, 1, 8, 8, 0)),
                step(UnderReview, "u-admin-3", "Under verification", at(2026, 1, 12, 10, 0)),
                step(Rejected, "u-admin-1", "Income exceeds limit", at(2026, 1, 18, 9, 0)),
            ],
        },
        Draft {
            id: "APP-2024-004",
            user_id: "u-demo-7",
            service_id: "pmay-housing",
            service_name: "PMAY - Housing for All",
            category: "housing",
            full_name: "Rajesh Kumar",
            mobile: "9876543216",
            remarks: "",
            history: vec![
                step(Pending, "system", submitted, at(2026, 1, 20, 11, 0)),
                step(UnderReview, "u-admin-3", "Document verification in progress", at(2026, 1, 25, 9, 0)),
            ],
        },
        Draft {
            id: "APP-2024-005",
            user_id: "u-demo-10",
            service_id: "digital-india-scholarship",
            service_name: "Digital India Scholarship",
            category: "digital-india",
            full_name: "Meera Iyer",
            mobile: "9876543219",
            remarks: "Verified by district office",
            history: vec![
                step(Pending, "system", submitted, at(2026, 1, 5, 7, 30)),
                step(UnderReview, "u-admin-3", "Picked up for review", at(2026, 1, 10, 10, 0)),
                step(Approved, "u-admin-1", "Verified by district office", at(2026, 1, 15, 10, 0)),
            ],
        },
        Draft {
            id: "APP-2024-006",
            user_id: "u-demo-6",
            service_id: "mudra-yojana",
            service_name: "Mudra Yojana",
            category: "msme",
            full_name: "Kavita Nair",
            mobile: "9876543215",
            remarks: "",
            history: vec![step(Pending, "system", submitted, at(2026, 1, 22, 8, 0))],
        },
        Draft {
            id: "APP-2024-007",
            user_id: "u-demo-1",
            service_id: "ayushman-bharat",
            service_name: "Ayushman Bharat Yojana",
            category: "health",
            full_name: "Rahul Sharma",
            mobile: "9876543210",
            remarks: "Auto-approved",
            history: vec![
                step(Pending, "system", submitted, at(2025, 12, 28, 9, 0)),
                step(UnderReview, "u-admin-3", "Fast-track review", at(2026, 1, 2, 10, 0)),
                step(Approved, "u-admin-1", "Auto-approved", at(2026, 1, 5, 10, 0)),
            ],
        },
        Draft {
            id: "APP-2024-008",
            user_id: "u-demo-5",
            service_id: "kisan-credit-card",
            service_name: "Kisan Credit Card",
            category: "agriculture",
            full_name: "Vikram Joshi",
            mobile: "9876543214",
            remarks: "Missing land documents",
            history: vec![
                step(Pending, "system", submitted, at(2026, 1, 18, 10, 0)),
                step(UnderReview, "u-admin-3", "Document check initiated", at(2026, 1, 22, 10, 0)),
                step(Rejected, "u-admin-1", "Missing land documents", at(2026, 1, 25, 9, 0)),
            ],
        },
    ]
    .into_iter()
    .map(Draft::build)
    .collect()
}

struct Listing<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
    category: &'a str,
    state: &'a str,
    eligibility: &'a str,
    documents: &'a [&'a str],
    rules: Option<EligibilityRules>,
}

impl Listing<'_> {
    fn build(self) -> Scheme {
        Scheme {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            category: self.category.to_string(),
            state: self.state.to_string(),
            eligibility: self.eligibility.to_string(),
            documents: self.documents.iter().map(|d| d.to_string()).collect(),
            status: SchemeStatus::Active,
            rules: self.rules,
            created_at: None,
            updated_at: None,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn schemes() -> Vec<Scheme> {
    vec![
        Listing {
            id: "pm-kisan",
            name: "PM Kisan Samman Nidhi",
            description: "Rs 6,000 a year in three instalments to landholding farmer families",
            category: "agriculture",
            state: "central",
            eligibility: "Small and marginal farmers with cultivable land",
            documents: &["Aadhaar Card", "Land Records", "Bank Account Details"],
            rules: Some(EligibilityRules {
                min_age: Some(18),
                occupation_required: strings(&["farmer"]),
                ..EligibilityRules::default()
            }),
        },
        Listing {
            id: "ayushman-bharat",
            name: "Ayushman Bharat Yojana",
            description: "Health cover of Rs 5 lakh per family per year for hospitalisation",
            category: "health",
            state: "central",
            eligibility: "Low-income families listed in SECC data",
            documents: &["Aadhaar Card", "Ration Card", "Income Certificate"],
            rules: Some(EligibilityRules {
                max_income: Some(500_000),
                ..EligibilityRules::default()
            }),
        },
        Listing {
            id: "sukanya-samriddhi",
            name: "Sukanya Samriddhi Yojana",
            description: "High-interest savings account for the education of a girl child",
            category: "women-empowerment",
            state: "central",
            eligibility: "Parents or guardians of a girl child below 10 years",
            documents: &["Birth Certificate", "Aadhaar Card", "Address Proof"],
            rules: Some(EligibilityRules {
                max_age: Some(10),
                ..EligibilityRules::default()
            }),
        },
        Listing {
            id: "pmay-housing",
            name: "PMAY - Housing for All",
            description: "Interest subsidy on home loans for first-time buyers",
            category: "housing",
            state: "central",
            eligibility: "Families without a pucca house | Income limit: Rs 3,00,000",
            documents: &["Aadhaar Card", "Income Certificate", "Property Documents"],
            rules: Some(EligibilityRules {
                min_age: Some(18),
                max_income: Some(300_000),
                ..EligibilityRules::default()
            }),
        },
        Listing {
            id: "digital-india-scholarship",
            name: "Digital India Scholarship",
            description: "Tuition support for students in digital skills courses",
            category: "digital-india",
            state: "central",
            eligibility: "Students aged 16-25 | Income limit: Rs 2,50,000",
            documents: &["Aadhaar Card", "Marksheet", "Income Certificate", "Bonafide Certificate"],
            rules: Some(EligibilityRules {
                min_age: Some(16),
                max_age: Some(25),
                max_income: Some(250_000),
                occupation_required: strings(&["student"]),
                ..EligibilityRules::default()
            }),
        },
        Listing {
            id: "mudra-yojana",
            name: "Mudra Yojana",
            description: "Collateral-free loans up to Rs 10 lakh for micro enterprises",
            category: "msme",
            state: "central",
            eligibility: "Non-farm micro and small business owners",
            documents: &["Aadhaar Card", "PAN Card", "Business Plan", "Bank Statements"],
            rules: Some(EligibilityRules {
                min_age: Some(18),
                ..EligibilityRules::default()
            }),
        },
        Listing {
            id: "kisan-credit-card",
            name: "Kisan Credit Card",
            description: "Short-term crop loans at subsidised interest",
            category: "agriculture",
            state: "central",
            eligibility: "Farmers, tenant farmers and sharecroppers aged 18-75",
            documents: &["Aadhaar Card", "Land Records", "Passport Photo"],
            rules: Some(EligibilityRules {
                min_age: Some(18),
                max_age: Some(75),
                occupation_required: strings(&["farmer"]),
                ..EligibilityRules::default()
            }),
        },
        Listing {
            id: "atal-pension",
            name: "Atal Pension Yojana",
            description: "Guaranteed pension scheme for unorganized sector workers",
            category: "pensions",
            state: "central",
            eligibility: "Indian citizens aged 18-40 with bank account",
            documents: &["Aadhaar Card", "Bank Account Details", "Mobile Number"],
            rules: Some(EligibilityRules {
                min_age: Some(18),
                max_age: Some(40),
                ..EligibilityRules::default()
            }),
        },
        Listing {
            id: "old-age-pension",
            name: "Old Age Pension Scheme",
            description: "Monthly pension for senior citizens above 60 years",
            category: "pensions",
            state: "central",
            eligibility: "Citizens above 60 years with income below poverty line",
            documents: &["Aadhaar Card", "Age Proof", "Income Certificate", "Bank Account"],
            rules: Some(EligibilityRules {
                min_age: Some(60),
                max_income: Some(100_000),
                ..EligibilityRules::default()
            }),
        },
        Listing {
            id: "water-bill",
            name: "Pay Water Bill",
            description: "Pay your municipal water bill",
            category: "utilities",
            state: "maharashtra",
            eligibility: "All water connection holders",
            documents: &["Consumer Number"],
            rules: None,
        },
    ]
    .into_iter()
    .map(Listing::build)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_shapes() {
        let users = users();
        assert_eq!(users.len(), 13);
        assert_eq!(users.iter().filter(|u| u.role.is_admin()).count(), 3);

        let apps = applications();
        assert_eq!(apps.len(), 8);
        assert!(apps.iter().all(|a| a.date_applied == a.status_history[0].date));
        assert_eq!(apps[1].status, ApplicationStatus::Approved);
        assert_eq!(apps[3].status, ApplicationStatus::UnderReview);

        // Every applied-for scheme is in the catalog
        let schemes = schemes();
        assert_eq!(schemes.len(), 10);
        assert!(apps
            .iter()
            .all(|a| schemes.iter().any(|s| s.id == a.service_id && s.name == a.service_name)));
    }
}
