//! Repository tests against a live PostgreSQL.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p epdc-db -- --ignored
//!
//! Each test works with uniquely named rows and cleans up after itself, so
//! the suite can share one scratch database.

use epdc_db::{
    schema, Company, Contact, DictionaryEntry, Directory, Education, Email, Owner, Phone, Post,
    Practice, Siren, SirenType,
};

async fn directory() -> Directory {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = epdc_db::create_pool_from_url(&url, 2)
        .await
        .expect("pool creation failed");
    schema::create_tables(&pool).await.expect("schema");
    Directory::from_pool(pool)
}

fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{prefix}-{nanos}")
}

async fn phones_with_company_zero(dir: &Directory) -> i64 {
    sqlx::query_scalar("SELECT count(*) FROM phones WHERE company_id = 0")
        .fetch_one(dir.pool())
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn zero_ids_never_hit_the_database() {
    let dir = directory().await;
    assert_eq!(dir.companies().get(0).await.unwrap(), Company::default());
    assert_eq!(dir.contacts().get(0).await.unwrap(), Contact::default());
    assert_eq!(dir.scopes().get(0).await.unwrap(), DictionaryEntry::default());
    dir.sirens().delete(0).await.unwrap();
    assert!(dir.contacts().list_by_company(0).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn missing_row_is_not_found() {
    let dir = directory().await;
    let err = dir.posts().get(i64::MAX).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "requires database"]
async fn dictionary_rejects_duplicate_names() {
    let dir = directory().await;
    let name = unique("rank");
    let id = dir.ranks().create(&DictionaryEntry::new(&name)).await.unwrap();

    let err = dir
        .ranks()
        .create(&DictionaryEntry::new(&name))
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());

    let stored = dir.ranks().get(id).await.unwrap();
    assert_eq!(stored.name, name);
    assert!(stored.created_at.is_some());

    dir.ranks().delete(id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn company_children_follow_saves() {
    let dir = directory().await;
    let scope_id = dir
        .scopes()
        .create(&DictionaryEntry::new(unique("scope")))
        .await
        .unwrap();

    let mut company = Company {
        name: unique("ООО Ромашка"),
        address: "ул. Ленина, 1".into(),
        scope_id,
        emails: vec![Email::new("info@romashka.ru")],
        phones: vec![Phone::new(4951112233, false), Phone::new(4954445566, false)],
        faxes: vec![Phone::new(4957778899, true)],
        ..Company::default()
    };
    let id = dir.companies().create(&company).await.unwrap();

    let stored = dir.companies().get(id).await.unwrap();
    assert_eq!(stored.emails.len(), 1);
    assert_eq!(stored.phones.len(), 2);
    assert_eq!(stored.faxes.len(), 1);

    let before = dir.phones().phones_for(Owner::Company(id)).await.unwrap();
    let kept_id = before
        .iter()
        .find(|p| p.phone == 4954445566)
        .map(|p| p.id)
        .unwrap();

    company.id = id;
    company.phones = vec![Phone::new(4954445566, false), Phone::new(4950000000, false)];
    company.emails = vec![Email::new("office@romashka.ru")];
    dir.companies().update(&company).await.unwrap();

    let after = dir.phones().phones_for(Owner::Company(id)).await.unwrap();
    let numbers: Vec<i64> = after.iter().map(|p| p.phone).collect();
    assert_eq!(numbers, vec![4950000000, 4954445566]);
    assert!(after.iter().any(|p| p.id == kept_id), "unchanged number keeps its row");

    let emails = dir.emails().list_for(Owner::Company(id)).await.unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].email, "office@romashka.ru");

    let listed = dir.companies().list().await.unwrap();
    let item = listed.iter().find(|c| c.id == id).unwrap();
    assert_eq!(item.phones, vec!["4950000000", "4954445566"]);
    assert_eq!(item.faxes, vec!["4957778899"]);
    assert!(!item.scope_name.is_empty());

    dir.companies().delete(id).await.unwrap();
    assert!(dir.phones().phones_for(Owner::Company(id)).await.unwrap().is_empty());
    assert!(dir.emails().list_for(Owner::Company(id)).await.unwrap().is_empty());
    dir.scopes().delete(scope_id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn contact_update_keeps_post_and_civil_defence_post_apart() {
    let dir = directory().await;
    let post = epdc_db::Post {
        name: unique("инженер"),
        ..Default::default()
    };
    let go_post = epdc_db::Post {
        name: unique("начальник штаба"),
        go: true,
        ..Default::default()
    };
    let post_id = dir.posts().create(&post).await.unwrap();
    let go_post_id = dir.posts().create(&go_post).await.unwrap();

    let mut contact = Contact {
        name: unique("Иванов"),
        birthday: "03.09.1971".into(),
        ..Contact::default()
    };
    let id = dir.contacts().create(&contact).await.unwrap();

    contact.id = id;
    contact.post_id = post_id;
    contact.post_go_id = go_post_id;
    contact.phones = vec![Phone::new(4951234567, false)];
    dir.contacts().update(&contact).await.unwrap();

    let stored = dir.contacts().get(id).await.unwrap();
    assert_eq!(stored.post_id, post_id);
    assert_eq!(stored.post_go_id, go_post_id);
    assert_eq!(stored.birthday, "03.09.1971");
    assert_eq!(stored.phones.len(), 1);

    dir.contacts().delete(id).await.unwrap();
    dir.posts().delete(post_id).await.unwrap();
    dir.posts().delete(go_post_id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn practice_dates_are_spelled_out() {
    let dir = directory().await;
    let id = dir
        .practices()
        .create(&Practice {
            topic: unique("эвакуация"),
            date_of_practice: "05.03.2017".into(),
            ..Practice::default()
        })
        .await
        .unwrap();

    let stored = dir.practices().get(id).await.unwrap();
    assert_eq!(stored.date_of_practice, "05.03.2017");
    assert_eq!(stored.date_str, "05 марта 2017 года");

    dir.practices().delete(id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn siren_keeps_contact_and_company_apart() {
    let dir = directory().await;
    let type_id = dir
        .siren_types()
        .create(&SirenType {
            name: unique("С-40"),
            radius: 1500,
            ..SirenType::default()
        })
        .await
        .unwrap();
    assert_eq!(dir.siren_types().get(type_id).await.unwrap().radius, 1500);

    let company_name = unique("МУП Водоканал");
    let company_id = dir
        .companies()
        .create(&Company {
            name: company_name.clone(),
            ..Company::default()
        })
        .await
        .unwrap();
    let contact_name = unique("Петров");
    let contact_id = dir
        .contacts()
        .create(&Contact {
            name: contact_name.clone(),
            ..Contact::default()
        })
        .await
        .unwrap();
    assert_ne!(company_id, contact_id);

    let siren_id = dir
        .sirens()
        .create(&Siren {
            num_id: 1021,
            num_pass: unique("pass"),
            type_id,
            contact_id,
            company_id,
            ..Siren::default()
        })
        .await
        .unwrap();

    let stored = dir.sirens().get(siren_id).await.unwrap();
    assert_eq!(stored.contact_id, contact_id);
    assert_eq!(stored.company_id, company_id);

    let listed = dir.sirens().list().await.unwrap();
    let item = listed.iter().find(|s| s.siren.id == siren_id).unwrap();
    assert_eq!(item.siren.type_id, type_id);
    assert_eq!(item.siren.contact_id, contact_id);
    assert_eq!(item.siren.company_id, company_id);
    assert_eq!(item.contact_name, contact_name);
    assert_eq!(item.company_name, company_name);
    assert!(item.type_name.starts_with("С-40"));

    dir.sirens().delete(siren_id).await.unwrap();
    dir.contacts().delete(contact_id).await.unwrap();
    dir.companies().delete(company_id).await.unwrap();
    dir.siren_types().delete(type_id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn phone_sync_without_owner_stores_nothing() {
    let dir = directory().await;
    let before = phones_with_company_zero(&dir).await;

    let plan = dir
        .phones()
        .sync(Owner::Company(0), false, &[Phone::new(42, false)])
        .await
        .unwrap();

    assert!(plan.is_empty());
    assert_eq!(phones_with_company_zero(&dir).await, before);
}

#[tokio::test]
#[ignore = "requires database"]
async fn phone_sync_leaves_stored_duplicates_alone() {
    let dir = directory().await;
    let company_id = dir
        .companies()
        .create(&Company {
            name: unique("ЗАО Дубль"),
            ..Company::default()
        })
        .await
        .unwrap();
    let owner = Owner::Company(company_id);
    for _ in 0..2 {
        dir.phones()
            .create(&Phone {
                company_id,
                ..Phone::new(4953332211, false)
            })
            .await
            .unwrap();
    }

    let plan = dir
        .phones()
        .sync(owner, false, &[Phone::new(4953332211, false)])
        .await
        .unwrap();
    assert!(plan.is_empty());
    assert_eq!(dir.phones().phones_for(owner).await.unwrap().len(), 2);

    let plan = dir.phones().sync(owner, false, &[]).await.unwrap();
    assert_eq!(plan.remove, vec![4953332211, 4953332211]);
    assert!(dir.phones().phones_for(owner).await.unwrap().is_empty());

    dir.companies().delete(company_id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn company_get_spells_out_practice_dates() {
    let dir = directory().await;
    let company_id = dir
        .companies()
        .create(&Company {
            name: unique("ОАО Заря"),
            ..Company::default()
        })
        .await
        .unwrap();
    let practice_id = dir
        .practices()
        .create(&Practice {
            company_id,
            topic: unique("пожар"),
            date_of_practice: "05.03.2017".into(),
            ..Practice::default()
        })
        .await
        .unwrap();

    let stored = dir.companies().get(company_id).await.unwrap();
    let dates: Vec<(&str, &str)> = stored
        .practices
        .iter()
        .map(|p| (p.date_of_practice.as_str(), p.date_str.as_str()))
        .collect();
    assert_eq!(dates, vec![("05.03.2017", "05 марта 2017 года")]);

    let listed = dir.companies().list().await.unwrap();
    let item = listed.iter().find(|c| c.id == company_id).unwrap();
    assert_eq!(item.practices, vec!["05.03.2017"]);

    dir.practices().delete(practice_id).await.unwrap();
    dir.companies().delete(company_id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn contact_lists_carry_department_names() {
    let dir = directory().await;
    let department = unique("отдел ГО");
    let department_id = dir
        .departments()
        .create(&DictionaryEntry::new(&department))
        .await
        .unwrap();
    let go_post = unique("уполномоченный");
    let go_post_id = dir
        .posts()
        .create(&Post {
            name: go_post.clone(),
            go: true,
            ..Post::default()
        })
        .await
        .unwrap();
    let company_id = dir
        .companies()
        .create(&Company {
            name: unique("ГУП Свет"),
            ..Company::default()
        })
        .await
        .unwrap();
    let contact_id = dir
        .contacts()
        .create(&Contact {
            name: unique("Сидоров"),
            company_id,
            department_id,
            post_go_id: go_post_id,
            ..Contact::default()
        })
        .await
        .unwrap();

    let listed = dir.contacts().list().await.unwrap();
    let item = listed.iter().find(|c| c.id == contact_id).unwrap();
    assert_eq!(item.department_name, department);
    assert!(!item.company_name.is_empty());

    let by_company = dir.contacts().list_by_company(company_id).await.unwrap();
    assert_eq!(by_company.len(), 1);
    assert_eq!(by_company[0].id, contact_id);
    assert_eq!(by_company[0].department_name, department);
    assert_eq!(by_company[0].post_go_name, go_post);

    dir.contacts().delete(contact_id).await.unwrap();
    dir.companies().delete(company_id).await.unwrap();
    dir.posts().delete(go_post_id).await.unwrap();
    dir.departments().delete(department_id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn education_list_spells_out_both_dates() {
    let dir = directory().await;
    let note = unique("курсы");
    let id = dir
        .educations()
        .create(&Education {
            start_date: "01.02.2020".into(),
            end_date: "31.12.2020".into(),
            note: note.clone(),
            ..Education::default()
        })
        .await
        .unwrap();

    let listed = dir.educations().list().await.unwrap();
    let item = listed.iter().find(|e| e.id == id).unwrap();
    assert_eq!(item.start_str, "01 февраля 2020 года");
    assert_eq!(item.end_str, "31 декабря 2020 года");
    assert_eq!(item.note, note);

    dir.educations().delete(id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn posts_filter_by_civil_defence_flag() {
    let dir = directory().await;
    let plain = unique("бухгалтер");
    let go = unique("начальник ГО");
    let plain_id = dir
        .posts()
        .create(&Post {
            name: plain.clone(),
            ..Post::default()
        })
        .await
        .unwrap();
    let go_id = dir
        .posts()
        .create(&Post {
            name: go.clone(),
            go: true,
            ..Post::default()
        })
        .await
        .unwrap();

    let go_posts = dir.posts().list_by_go(true).await.unwrap();
    assert!(go_posts.iter().any(|p| p.id == go_id));
    assert!(go_posts.iter().all(|p| p.go));
    assert!(!go_posts.iter().any(|p| p.id == plain_id));

    let plain_posts = dir.posts().list_by_go(false).await.unwrap();
    assert!(plain_posts.iter().any(|p| p.id == plain_id));
    assert!(!plain_posts.iter().any(|p| p.id == go_id));

    let go_select = dir.posts().select_by_go(true).await.unwrap();
    assert!(go_select.iter().any(|i| i.id == go_id && i.name == go));
    assert!(!go_select.iter().any(|i| i.id == plain_id));

    let plain_select = dir.posts().select_by_go(false).await.unwrap();
    assert!(plain_select.iter().any(|i| i.id == plain_id && i.name == plain));

    dir.posts().delete(plain_id).await.unwrap();
    dir.posts().delete(go_id).await.unwrap();
}
