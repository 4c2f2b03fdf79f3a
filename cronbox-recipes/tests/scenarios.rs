mod support;

use std::sync::Arc;

use cronbox_recipes::classify::RecipeClassifier;
use cronbox_recipes::pipeline::extract_recipes;
use cronbox_recipes::{JobOutcome, Recipe, RecipePipeline, RecipesJob};
use support::{
    DINNER, LUNCH, RecordingNotifier, StaticFetcher, init_tracing, listing, recipes_config, wednesday,
};

fn recipe(title: &str, url: &str) -> Recipe {
    Recipe {
        title: title.into(),
        url: url.into(),
    }
}

async fn run_single(markup: &str) -> Vec<Recipe> {
    let fetcher = Arc::new(StaticFetcher::default().with_page(DINNER, markup));
    let pipeline = RecipePipeline::new(fetcher, RecipeClassifier::default(), 5);
    pipeline.run(&[DINNER.to_string()], &wednesday()).await.recipes
}

#[tokio::test]
async fn vegan_chili_is_extracted_from_the_dinner_page() {
    let found = run_single(r#"<a href="/recipes/vegan-chili/">Vegan Chili</a>"#).await;
    assert_eq!(
        found,
        vec![recipe("Vegan Chili", "https://www.noracooks.com/recipes/vegan-chili")]
    );
}

#[tokio::test]
async fn category_links_are_discarded() {
    let found = run_single(r#"<a href="/category/soups/">Soups</a>"#).await;
    assert!(found.is_empty());
}

#[tokio::test]
async fn trailing_slash_variants_collapse_to_one_recipe() {
    let found = run_single(
        r#"<a href="/vegan-chili/">Vegan Chili</a>
           <a href="https://www.noracooks.com/vegan-chili">Vegan Chili Again</a>"#,
    )
    .await;
    assert_eq!(
        found,
        vec![recipe("Vegan Chili", "https://www.noracooks.com/vegan-chili")]
    );
}

#[test]
fn whitespace_text_falls_back_to_title_attribute() {
    let found = extract_recipes(
        r#"<a href="/best-tacos/" title="Best Tacos Ever">  </a>"#,
        DINNER,
        &RecipeClassifier::default(),
    )
    .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Best Tacos Ever");
}

#[tokio::test]
async fn short_candidate_lists_are_selected_whole_in_order() {
    let page = listing(&["vegan-chili", "lentil-soup", "tofu-scramble"]);
    let fetcher = Arc::new(StaticFetcher::default().with_page(DINNER, &page));
    let pipeline = RecipePipeline::new(fetcher, RecipeClassifier::default(), 5);

    let report = pipeline.run(&[DINNER.to_string()], &wednesday()).await;

    assert_eq!(report.recipes.len(), 3);
    assert_eq!(report.selected, report.recipes);
    let titles: Vec<_> = report.selected.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["vegan chili", "lentil soup", "tofu scramble"]);
}

#[tokio::test]
async fn one_failing_source_still_succeeds_with_the_other() {
    init_tracing();
    let fetcher = Arc::new(
        StaticFetcher::default().with_page(LUNCH, &listing(&["chickpea-salad", "black-bean-wraps"])),
    );
    let notifier = Arc::new(RecordingNotifier::default());
    let job = RecipesJob::new(
        recipes_config(&[DINNER, LUNCH]),
        fetcher.clone(),
        notifier.clone(),
    );

    let digest = job.preview(&wednesday()).await;
    assert_eq!(digest.report.failures.len(), 1);
    assert_eq!(digest.report.failures[0].url, DINNER);
    assert!(digest.report.failures[0].error.contains("connection refused"));
    assert_eq!(digest.report.recipes.len(), 2);

    let outcome = job.run(&wednesday()).await;
    assert_eq!(outcome, JobOutcome::success(2));
    assert_eq!(fetcher.calls(), 4);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("https://www.noracooks.com/chickpea-salad"));
    assert!(sent[0].body.contains(&format!("- {DINNER}")));
}
