//! Listings, post detail, and the create/edit forms.

#[macro_use]
mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;

use common::{
    create_group, create_post, create_user, multipart_body, multipart_content_type, post_cards,
    session_cookie, setup, template_name, SMALL_GIF,
};
use yatube_service::db::post_repo::{self, PostFilter};

fn html(body: actix_web::web::Bytes) -> String {
    String::from_utf8(body.to_vec()).unwrap()
}

#[actix_web::test]
async fn listings_split_into_pages_of_ten() {
    let ctx = setup().await;
    let author = create_user(&ctx.state, "TestUser").await;
    let group = create_group(&ctx.state, "Тестовая группа", "test-slug").await;
    for i in 0..13 {
        create_post(&ctx.state, &author, &format!("Пост номер {i}"), Some(&group)).await;
    }
    let app = init_app!(ctx.state);

    for base in ["/", "/group/test-slug/", "/profile/TestUser/"] {
        let req = test::TestRequest::get().uri(base).to_request();
        let page = html(test::call_and_read_body(&app, req).await);
        assert_eq!(post_cards(&page), 10, "{base}");

        let req = test::TestRequest::get()
            .uri(&format!("{base}?page=2"))
            .to_request();
        let page = html(test::call_and_read_body(&app, req).await);
        assert_eq!(post_cards(&page), 3, "{base}?page=2");
    }
}

#[actix_web::test]
async fn page_lookup_is_forgiving() {
    let ctx = setup().await;
    let author = create_user(&ctx.state, "TestUser").await;
    for i in 0..13 {
        create_post(&ctx.state, &author, &format!("Пост {i}"), None).await;
    }
    let app = init_app!(ctx.state);

    for (query, expected) in [("page=abc", 10), ("page=0", 3), ("page=999", 3)] {
        let req = test::TestRequest::get()
            .uri(&format!("/profile/TestUser/?{query}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{query}");
        let page = html(test::read_body(resp).await);
        assert_eq!(post_cards(&page), expected, "{query}");
    }
}

#[actix_web::test]
async fn newest_post_comes_first() {
    let ctx = setup().await;
    let author = create_user(&ctx.state, "TestUser").await;
    create_post(&ctx.state, &author, "Старый пост", None).await;
    create_post(&ctx.state, &author, "Новый пост", None).await;
    let app = init_app!(ctx.state);

    let req = test::TestRequest::get().uri("/profile/TestUser/").to_request();
    let page = html(test::call_and_read_body(&app, req).await);
    let newer = page.find("Новый пост").unwrap();
    let older = page.find("Старый пост").unwrap();
    assert!(newer < older);
}

#[actix_web::test]
async fn group_page_shows_only_its_posts() {
    let ctx = setup().await;
    let author = create_user(&ctx.state, "TestUser").await;
    let cats = create_group(&ctx.state, "Коты", "cats").await;
    let dogs = create_group(&ctx.state, "Собаки", "dogs").await;
    create_post(&ctx.state, &author, "Пост про котов", Some(&cats)).await;
    let app = init_app!(ctx.state);

    let req = test::TestRequest::get().uri("/group/cats/").to_request();
    let page = html(test::call_and_read_body(&app, req).await);
    assert!(page.contains("Пост про котов"));
    assert!(page.contains("Коты"));

    let req = test::TestRequest::get().uri("/group/dogs/").to_request();
    let page = html(test::call_and_read_body(&app, req).await);
    assert_eq!(post_cards(&page), 0);
    assert!(!page.contains("Пост про котов"));
    assert!(page.contains(&dogs.title));
}

#[actix_web::test]
async fn profile_and_detail_show_author_statistics() {
    let ctx = setup().await;
    let author = create_user(&ctx.state, "TestUser").await;
    create_post(&ctx.state, &author, "Первый", None).await;
    let post = create_post(&ctx.state, &author, "Второй", None).await;
    let app = init_app!(ctx.state);

    let req = test::TestRequest::get().uri("/profile/TestUser/").to_request();
    let page = html(test::call_and_read_body(&app, req).await);
    assert!(page.contains("Всего постов: 2"));

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", post.id))
        .to_request();
    let page = html(test::call_and_read_body(&app, req).await);
    assert!(page.contains("Второй"));
    assert!(page.contains("Всего постов автора: <span>2</span>"));
    assert!(!page.contains("/edit/"));
}

#[actix_web::test]
async fn create_form_exposes_field_widgets() {
    let ctx = setup().await;
    let user = create_user(&ctx.state, "TestUser").await;
    create_group(&ctx.state, "Тестовая группа", "test-slug").await;
    let app = init_app!(ctx.state);

    let req = test::TestRequest::get()
        .uri("/create/")
        .cookie(session_cookie(&ctx.state, &user))
        .to_request();
    let page = html(test::call_and_read_body(&app, req).await);

    assert!(page.contains(r#"<textarea name="text""#));
    assert!(page.contains(r#"<select name="group""#));
    assert!(page.contains(r#"<option value="" selected>---------</option>"#));
    assert!(page.contains("Тестовая группа"));
    assert!(page.contains(r#"<input type="file" name="image""#));
}

#[actix_web::test]
async fn valid_form_creates_post_with_image() {
    let ctx = setup().await;
    let user = create_user(&ctx.state, "TestUser").await;
    let group = create_group(&ctx.state, "Тестовая группа", "test-slug").await;
    let app = init_app!(ctx.state);

    let group_id = group.id.to_string();
    let body = multipart_body(
        &[("text", "Тестовый текст"), ("group", group_id.as_str())],
        Some(("image", "small.gif", SMALL_GIF)),
    );
    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(session_cookie(&ctx.state, &user))
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/profile/TestUser/"
    );

    let posts = post_repo::find_posts(&ctx.state.db, PostFilter::All, 10, 0)
        .await
        .unwrap();
    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert_eq!(post.text, "Тестовый текст");
    assert_eq!(post.author_id, user.id);
    assert_eq!(post.group_id, Some(group.id));
    assert_eq!(post.image.as_deref(), Some("posts/small.gif"));
    assert!(ctx.media.path().join("posts/small.gif").exists());
}

#[actix_web::test]
async fn image_is_shown_on_every_page() {
    let ctx = setup().await;
    let user = create_user(&ctx.state, "TestUser").await;
    create_group(&ctx.state, "Тестовая группа", "test-slug").await;
    let app = init_app!(ctx.state);

    let body = multipart_body(
        &[("text", "Пост с картинкой"), ("group", "1")],
        Some(("image", "small.gif", SMALL_GIF)),
    );
    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(session_cookie(&ctx.state, &user))
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);

    let post = post_repo::find_posts(&ctx.state.db, PostFilter::All, 1, 0)
        .await
        .unwrap()
        .remove(0);
    let src = r#"src="/media/posts/small.gif""#;

    for uri in [
        "/".to_string(),
        "/profile/TestUser/".to_string(),
        "/group/test-slug/".to_string(),
        format!("/posts/{}/", post.id),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let page = html(test::call_and_read_body(&app, req).await);
        assert!(page.contains(src), "{uri}");
    }

    let req = test::TestRequest::get()
        .uri("/media/posts/small.gif")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/gif"
    );
    assert_eq!(test::read_body(resp).await.as_ref(), SMALL_GIF);
}

#[actix_web::test]
async fn invalid_form_is_rendered_again() {
    let ctx = setup().await;
    let user = create_user(&ctx.state, "TestUser").await;
    let app = init_app!(ctx.state);

    let cases: Vec<(Vec<(&str, &str)>, Option<(&str, &str, &[u8])>, &str)> = vec![
        (vec![("text", "   ")], None, "Текст поста не может быть пустым"),
        (vec![("text", "Текст"), ("group", "42")], None, "Выберите корректный вариант"),
        (
            vec![("text", "Текст")],
            Some(("image", "notes.gif", b"not an image".as_slice())),
            "Загрузите правильное изображение",
        ),
    ];

    for (fields, file, message) in cases {
        let req = test::TestRequest::post()
            .uri("/create/")
            .cookie(session_cookie(&ctx.state, &user))
            .insert_header((header::CONTENT_TYPE, multipart_content_type()))
            .set_payload(multipart_body(&fields, file))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{message}");
        let page = html(test::read_body(resp).await);
        assert_eq!(template_name(&page), Some("posts/create_post.html"));
        assert!(page.contains(message), "{message}");
    }

    let count = post_repo::count_posts(&ctx.state.db, PostFilter::All)
        .await
        .unwrap();
    assert_eq!(count, 0);
    assert!(!ctx.media.path().join("posts").exists());
}

#[actix_web::test]
async fn anonymous_create_stores_nothing() {
    let ctx = setup().await;
    let app = init_app!(ctx.state);

    let req = test::TestRequest::post()
        .uri("/create/")
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(&[("text", "Аноним")], None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/auth/login/?next=/create/"
    );
    let count = post_repo::count_posts(&ctx.state.db, PostFilter::All)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[actix_web::test]
async fn author_edit_changes_post() {
    let ctx = setup().await;
    let author = create_user(&ctx.state, "TestUser").await;
    let group = create_group(&ctx.state, "Тестовая группа", "test-slug").await;
    let post = create_post(&ctx.state, &author, "Исходный текст", None).await;
    let app = init_app!(ctx.state);
    let edit_url = format!("/posts/{}/edit/", post.id);

    let req = test::TestRequest::get()
        .uri(&edit_url)
        .cookie(session_cookie(&ctx.state, &author))
        .to_request();
    let page = html(test::call_and_read_body(&app, req).await);
    assert!(page.contains("Исходный текст"));

    let group_id = group.id.to_string();
    let req = test::TestRequest::post()
        .uri(&edit_url)
        .cookie(session_cookie(&ctx.state, &author))
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(
            &[("text", "Изменённый текст"), ("group", group_id.as_str())],
            None,
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        format!("/posts/{}/", post.id).as_str()
    );

    let edited = post_repo::find_post_by_id(&ctx.state.db, post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.text, "Изменённый текст");
    assert_eq!(edited.group_id, Some(group.id));
    assert_eq!(edited.id, post.id);
    assert_eq!(
        post_repo::count_posts(&ctx.state.db, PostFilter::All)
            .await
            .unwrap(),
        1
    );
}

#[actix_web::test]
async fn edit_keeps_or_clears_image() {
    let ctx = setup().await;
    let author = create_user(&ctx.state, "TestUser").await;
    let app = init_app!(ctx.state);

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(session_cookie(&ctx.state, &author))
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(
            &[("text", "С картинкой")],
            Some(("image", "small.gif", SMALL_GIF)),
        ))
        .to_request();
    test::call_service(&app, req).await;
    let post = post_repo::find_posts(&ctx.state.db, PostFilter::All, 1, 0)
        .await
        .unwrap()
        .remove(0);
    let edit_url = format!("/posts/{}/edit/", post.id);

    let req = test::TestRequest::post()
        .uri(&edit_url)
        .cookie(session_cookie(&ctx.state, &author))
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(&[("text", "Новый текст")], None))
        .to_request();
    test::call_service(&app, req).await;
    let kept = post_repo::find_post_by_id(&ctx.state.db, post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.image.as_deref(), Some("posts/small.gif"));

    let req = test::TestRequest::post()
        .uri(&edit_url)
        .cookie(session_cookie(&ctx.state, &author))
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(
            &[("text", "Без картинки"), ("image-clear", "on")],
            None,
        ))
        .to_request();
    test::call_service(&app, req).await;
    let cleared = post_repo::find_post_by_id(&ctx.state.db, post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cleared.image, None);
}

#[actix_web::test]
async fn non_author_edit_changes_nothing() {
    let ctx = setup().await;
    let author = create_user(&ctx.state, "TestUser").await;
    let other = create_user(&ctx.state, "Another").await;
    let post = create_post(&ctx.state, &author, "Текст автора", None).await;
    let app = init_app!(ctx.state);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(session_cookie(&ctx.state, &other))
        .insert_header((header::CONTENT_TYPE, multipart_content_type()))
        .set_payload(multipart_body(&[("text", "Чужой текст")], None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        format!("/posts/{}/", post.id).as_str()
    );

    let unchanged = post_repo::find_post_by_id(&ctx.state.db, post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.text, "Текст автора");
}
