//! Subcommand implementations driving the library flows.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Utc};

use portal::filters::{CompanySlug, FilterCodec, MemoryHistory, UrlHistory};
use portal::job_titles::search_job_titles;
use portal::models::question::{Location, Question, QuestionType, SortOrder, SortType};
use portal::questions::aggregates::relabel_question_aggregates;
use portal::questions::browse::BrowsePage;
use portal::questions::comments::AnswerPage;
use portal::questions::contribute::{record_encounter, ContributeQuestionForm, EncounterDetails};
use portal::questions::feed::QuestionFeed;
use portal::questions::slug::question_href;
use portal::resumes::{ExistingResume, ResumeForm, SubmitOutcome, RESUMES_PATH};
use portal::state::PortalState;
use portal::storage::FileUpload;

use crate::cli::{
    BrowseArgs, CommentsArgs, ContributeArgs, SortOrderArg, SortTypeArg, SubmitResumeArgs,
};

impl From<SortOrderArg> for SortOrder {
    fn from(arg: SortOrderArg) -> Self {
        match arg {
            SortOrderArg::Asc => SortOrder::Asc,
            SortOrderArg::Desc => SortOrder::Desc,
        }
    }
}

impl From<SortTypeArg> for SortType {
    fn from(arg: SortTypeArg) -> Self {
        match arg {
            SortTypeArg::Top => SortType::Top,
            SortTypeArg::New => SortType::New,
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub async fn run_browse(state: &PortalState, args: BrowseArgs) -> Result<()> {
    let mut page = BrowsePage::mount(MemoryHistory::new(args.url));

    if args.clear {
        page.clear_filters();
    }
    for raw in &args.companies {
        let company = CompanySlug::decode(raw)
            .with_context(|| format!("Invalid company slug '{raw}', expected {{id}}_{{label}}"))?;
        page.toggle_company(company, true);
    }
    for role in args.roles {
        page.toggle_role(role, true);
    }
    if let Some(order) = args.sort_order {
        page.set_sort_order(order.into());
    }
    if let Some(sort_type) = args.sort_type {
        page.set_sort_type(sort_type.into());
    }

    println!("{}", page.history().current());
    if page.filters().has_filters() {
        println!("(filters active)");
    }

    let mut feed = QuestionFeed::new();
    feed.show(state, page.question_query(today())?).await?;
    for _ in 1..args.pages {
        if !feed.load_more(state).await? {
            break;
        }
    }

    if feed.is_empty_result() {
        println!("Nothing found");
        return Ok(());
    }
    for question in feed.questions() {
        print_question(question);
    }
    if feed.has_more() {
        println!("... more questions available (--pages)");
    }
    Ok(())
}

fn print_question(question: &Question) {
    println!(
        "{}  [{}] {} ({} votes, {} answers)",
        question_href(&question.id, &question.content),
        question.question_type.label(),
        question.content,
        question.num_votes,
        question.num_answers
    );
    let summary = relabel_question_aggregates(&question.aggregated_question_encounters);
    if summary.total() == 0 {
        return;
    }
    let join = |counts: &[(String, u32)]| {
        counts
            .iter()
            .map(|(label, n)| format!("{label} ({n})"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("    companies: {}", join(&summary.company_counts));
    println!("    roles:     {}", join(&summary.role_counts));
    println!("    countries: {}", join(&summary.country_counts));
}

pub async fn run_comments(state: &PortalState, args: CommentsArgs) -> Result<()> {
    let mut page = AnswerPage::new(args.answer_id);
    page.set_sort_order(args.sort_order.into());
    page.set_sort_type(args.sort_type.into());

    let answer = page.load_answer(state).await?;
    println!("{} ({} votes)\n{}\n", answer.user, answer.num_votes, answer.content);

    let mut loaded = 0;
    if let Some(text) = args.post {
        page.draft_mut().set_content(text);
        let comment = page.post_comment(state).await?;
        println!("Posted comment {}", comment.id);
        loaded = 1;
    }
    while loaded < args.pages && page.has_more_comments() {
        page.load_more_comments(state).await?;
        loaded += 1;
    }

    for comment in page.comments() {
        println!(
            "- {} [{}] {}",
            comment.user,
            comment.created_at.format("%Y-%m-%d"),
            comment.content
        );
    }
    Ok(())
}

fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let date = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{raw}', expected YYYY-MM"))?;
    Ok((date.year(), date.month()))
}

pub async fn run_contribute(state: &PortalState, args: ContributeArgs) -> Result<()> {
    let question_type = QuestionType::decode(&args.question_type)
        .with_context(|| format!("Unknown question type '{}'", args.question_type))?;
    let location = Location::decode(&args.location)
        .with_context(|| format!("Invalid location '{}'", args.location))?;

    let mut form = ContributeQuestionForm::new(today());
    form.set_question_type(question_type);
    form.set_content(args.content);
    form.set_location(Some(location.clone()));
    form.set_company(Some(args.company_id.clone()));
    form.set_role(Some(args.role.clone()));
    if let Some(seen) = &args.seen {
        let (year, month) = parse_month(seen)?;
        form.set_month(year, month)?;
    }

    form.check_mut().run(state).await?;
    let similar = form.check().similar_questions().unwrap_or_default();
    if similar.is_empty() {
        println!("No similar questions found.");
    } else {
        println!("Similar questions:");
        for question in similar {
            println!(
                "  {}  {}",
                question_href(&question.id, &question.content),
                question.content
            );
        }
    }

    if let Some(question_id) = args.encounter {
        let details = EncounterDetails {
            company_id: args.company_id,
            role: args.role,
            location,
            seen_at: form.seen_at(),
        };
        let record = record_encounter(state, &question_id, &details).await?;
        println!("Recorded encounter {} for question {question_id}", record.id);
        return Ok(());
    }

    if !args.confirm_new {
        println!("{}", form.check().confirmation_label());
        println!("Re-run with --confirm-new to submit, or --encounter <QUESTION_ID>.");
        return Ok(());
    }
    form.check_mut().set_confirmed_new(true);
    let question = form.submit(state).await?;
    println!("Created {}", question_href(&question.id, &question.content));
    Ok(())
}

pub async fn run_submit_resume(state: &PortalState, args: SubmitResumeArgs) -> Result<()> {
    let mut form = match (args.resume_id, args.url) {
        (Some(resume_id), Some(url)) => ResumeForm::edit(
            ExistingResume {
                resume_id,
                title: args.title.clone(),
                role: args.role.clone(),
                experience: args.experience.clone(),
                location: args.location.clone(),
                additional_info: args.additional_info.clone(),
                url,
            },
            state.resume_max_bytes,
        ),
        _ => ResumeForm::new(state.resume_max_bytes),
    };

    form.set_title(&args.title);
    form.set_role(&args.role);
    form.set_experience(&args.experience);
    form.set_location(&args.location);
    if let Some(info) = &args.additional_info {
        form.set_additional_info(info);
    }
    form.set_guidelines_accepted(args.accept_guidelines);

    if let Some(path) = &args.file {
        let file = FileUpload::from_path(path).await?;
        form.on_file_drop(vec![file])?;
    }

    match form.submit(state).await? {
        SubmitOutcome::Created(record) => {
            println!("Created resume {} at {}", record.id, record.url);
            println!("See {RESUMES_PATH}");
        }
        SubmitOutcome::Updated(record) => {
            println!("Updated resume {} at {}", record.id, record.url);
        }
    }
    Ok(())
}

pub fn run_job_titles(query: &str) {
    for option in search_job_titles(query) {
        println!("{}\t{}", option.value, option.label);
    }
}
