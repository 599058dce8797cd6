//! Default canonical lead schema seeded on first run.

use leadflow_model::CanonicalColumn;

fn column(name: &str, aliases: &str, required: bool) -> CanonicalColumn {
    CanonicalColumn::new(
        name,
        aliases
            .split(',')
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect(),
        required,
    )
}

/// The fifteen-column lead schema every fresh store starts from.
///
/// Only `email` is required; everything else is optional. Alias spellings
/// cover the header variants commonly seen in exported lead lists.
pub fn default_columns() -> Vec<CanonicalColumn> {
    vec![
        column("name", "name,first name,full name,fname", false),
        column(
            "email",
            "email,email address,e-mail,work email,email addr",
            true,
        ),
        column("last_name", "last name,last,lname,surname", false),
        column("title", "title,job title,position,role", false),
        column(
            "company_name",
            "company,company name,organization,employer",
            false,
        ),
        column(
            "mobile_phone",
            "mobile,mobile phone,cell,cell phone,personal phone",
            false,
        ),
        column(
            "company_phone",
            "phone,company phone,work phone,office phone,telephone",
            false,
        ),
        column(
            "employee_count",
            "employees,# employees,company size,headcount,# of employees",
            false,
        ),
        column(
            "person_linkedin_url",
            "linkedin,person linkedin,linkedin url,linkedin profile,profile url",
            false,
        ),
        column("website", "website,url,company url,web,site", false),
        column(
            "company_linkedin_url",
            "company linkedin,company linkedin url,organization linkedin",
            false,
        ),
        column("city", "city,town,location", false),
        column("state", "state,province,region", false),
        column("country", "country,nation", false),
        column("industry", "industry,sector,vertical,field", false),
    ]
}
