//! CLI 모듈
//!
//! blockbase CLI 명령어 정의 및 구현

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::api;
use crate::config::{Config, ContentLocation, Overrides};
use crate::knowledge::{
    BlockRetriever, ListItem, Partition, QueryRequest, QueryResponse, StalenessRisk,
    DEFAULT_LIMIT,
};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "blockbase")]
#[command(version, about = "정적 지식 블록 키워드 검색", long_about = None)]
pub struct Cli {
    /// index.json 경로 (기본: ~/.blockbase/index.json)
    #[arg(long, global = true)]
    pub index: Option<PathBuf>,

    /// 원문 디렉토리 (blocks/, patterns/ 포함)
    #[arg(long, global = true)]
    pub content_dir: Option<PathBuf>,

    /// 원문 HTTP 기본 URL
    #[arg(long, global = true)]
    pub content_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 지식 블록 검색
    Query {
        /// 검색어 (여러 단어 가능)
        #[arg(required = true)]
        topic: Vec<String>,

        /// 카테고리 필터 (부분 일치)
        #[arg(short, long)]
        category: Option<String>,

        /// 날짜 하한 (YYYY-MM-DD)
        #[arg(short, long)]
        since: Option<String>,

        /// 파티션 (blocks | patterns)
        #[arg(short, long)]
        kind: Option<Partition>,

        /// 결과 개수 제한
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// JSON 출력
        #[arg(long)]
        json: bool,
    },

    /// id로 블록 원문 조회
    Get {
        /// 블록 파일명 (예: retry-backoff.md)
        id: String,

        /// JSON 출력
        #[arg(long)]
        json: bool,
    },

    /// 블록 목록
    List {
        /// 파티션 (blocks | patterns)
        #[arg(short, long)]
        kind: Option<Partition>,

        /// JSON 출력
        #[arg(long)]
        json: bool,
    },

    /// JSON-RPC 요청 처리 ("-"이면 stdin)
    Rpc {
        /// 요청 JSON (단일 객체 또는 배열)
        request: String,
    },

    /// 상태 확인
    Status,
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(Overrides {
        index: cli.index,
        content_dir: cli.content_dir,
        content_url: cli.content_url,
    })
    .context("설정 로드 실패")?;

    match cli.command {
        Commands::Query {
            topic,
            category,
            since,
            kind,
            limit,
            json,
        } => {
            let request = QueryRequest {
                topic: Some(topic.join(" ")),
                category,
                since,
                kind,
                limit: Some(limit),
            };
            cmd_query(&config, &request, json)
        }
        Commands::Get { id, json } => cmd_get(&config, &id, json).await,
        Commands::List { kind, json } => cmd_list(&config, kind, json),
        Commands::Rpc { request } => cmd_rpc(&config, &request).await,
        Commands::Status => cmd_status(&config),
    }
}

fn open_retriever(config: &Config) -> Result<BlockRetriever> {
    BlockRetriever::from_config(config).context("BlockRetriever 초기화 실패")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("JSON 직렬화 실패")?;
    println!("{}", text);
    Ok(())
}

// ============================================================================
// Command Implementations
// ============================================================================

/// 검색 명령어 (query)
fn cmd_query(config: &Config, request: &QueryRequest, json: bool) -> Result<()> {
    let retriever = open_retriever(config)?;
    let response = retriever.query(request);

    if json {
        return print_json(&response);
    }

    let topic = request.topic.as_deref().unwrap_or_default();

    if response.gap_detected {
        render_gap(topic, &response);
    } else {
        render_results(topic, &response);
    }

    Ok(())
}

/// 결과 출력
fn render_results(topic: &str, response: &QueryResponse) {
    println!("\n[OK] \"{}\" 검색 결과 ({} 건):\n", topic, response.count);

    for (i, result) in response.results.iter().enumerate() {
        let score = result
            .score
            .map(|s| format!(" [점수: {:.2}]", s))
            .unwrap_or_default();

        println!("{}. {}{}", i + 1, result.topic, score);

        let badge = confidence_badge(result.confidence.as_deref(), result.staleness_risk);
        if !badge.is_empty() {
            println!("   {}", badge);
        }

        if let Some(ref scope) = result.environment_scope {
            println!("   환경: {}", scope);
        }

        if !result.summary.is_empty() {
            println!("   {}", truncate_text(&result.summary, 200));
        }

        // 이론과 다른 실측 결과는 눈에 띄게
        if let Some(ref delta) = result.theory_delta {
            println!("   !  {}", delta);
        }

        println!("   파일: {}", result.id);
        println!();
    }

    if !response.staleness_warning.is_empty() {
        println!(
            "[!] 재검증 필요 (노후화): {}",
            response.staleness_warning.join(", ")
        );
        println!();
    }

    if !response.related_entries.is_empty() {
        println!("함께 알아둘 것:");
        for related in &response.related_entries {
            println!("  ->  {}", related.topic);
            println!("       {}", related.id);
        }
        println!();
    }
}

/// gap 출력
fn render_gap(topic: &str, response: &QueryResponse) {
    println!("\n[!] \"{}\"에 대한 확실한 매치가 없습니다.", topic);

    if response.near_miss {
        if let Some(score) = response.top_score {
            println!("    약한 매치만 있습니다 (최고 점수: {:.2}).", score);
        }
    }

    println!("    아직 다루지 않은 주제일 수 있습니다. 블록 추가를 고려하세요.");
    println!("    {}", response.hint);
    println!();
}

/// 원문 조회 명령어 (get)
async fn cmd_get(config: &Config, id: &str, json: bool) -> Result<()> {
    let retriever = open_retriever(config)?;
    let content = retriever.get_block(id).await?;

    if json {
        return print_json(&content);
    }

    match content.content {
        Some(ref text) => println!("{}", text),
        None => println!("[!] 블록을 찾을 수 없습니다: {}", content.id),
    }

    Ok(())
}

/// 목록 명령어 (list)
fn cmd_list(config: &Config, kind: Option<Partition>, json: bool) -> Result<()> {
    let retriever = open_retriever(config)?;
    let response = retriever.list(kind);

    if json {
        return print_json(&response);
    }

    if response.total == 0 {
        println!("[!] 공개된 블록이 없습니다.");
        return Ok(());
    }

    println!("[OK] 블록 목록 ({} 건):\n", response.total);

    for (label, items) in [("blocks", &response.blocks), ("patterns", &response.patterns)] {
        if items.is_empty() {
            continue;
        }
        println!("== {} ({})", label, items.len());
        for item in items {
            print_list_item(item);
        }
        println!();
    }

    println!("{}", response.hint);
    Ok(())
}

fn print_list_item(item: &ListItem) {
    println!(
        "  {:<40} [{}] {}",
        truncate_text(&item.topic, 40),
        item.confidence.as_deref().unwrap_or("-"),
        item.date.as_deref().unwrap_or("-"),
    );
    println!("        {}", item.id);
}

/// RPC 명령어 (rpc)
async fn cmd_rpc(config: &Config, request: &str) -> Result<()> {
    let raw = if request == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("stdin 읽기 실패")?;
        buf
    } else {
        request.to_string()
    };

    let retriever = open_retriever(config)?;
    let response = api::dispatch(&retriever, &raw).await;
    print_json(&response)
}

/// 상태 명령어 (status)
fn cmd_status(config: &Config) -> Result<()> {
    println!("blockbase v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("[*] 인덱스: {}", config.index_path.display());
    match &config.content {
        ContentLocation::Dir(dir) => println!("[*] 원문 디렉토리: {}", dir.display()),
        ContentLocation::Url(url) => println!("[*] 원문 URL: {}", url),
    }
    println!("[*] 조회 타임아웃: {:?}", config.fetch_timeout);

    match BlockRetriever::from_config(config) {
        Ok(retriever) => {
            let pool = retriever.pool();
            let stats = pool.stats();
            println!("[OK] 스냅샷 생성 시각: {}", stats.generated_at);
            println!(
                "[OK] blocks: {}, patterns: {} (internal: {})",
                stats.block_count, stats.pattern_count, stats.internal_count
            );

            let dangling = pool.dangling_connections();
            if !dangling.is_empty() {
                println!("[!] 존재하지 않는 connection: {} 건", dangling.len());
                for (from, to) in dangling {
                    tracing::debug!("Dangling connection: {} -> {}", from, to);
                }
            }
        }
        Err(e) => {
            println!("[!] 스냅샷 로드 실패: {:#}", e);
        }
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 신뢰도/노후화 배지
fn confidence_badge(confidence: Option<&str>, staleness: Option<StalenessRisk>) -> String {
    let staleness_str = match staleness {
        Some(risk @ (StalenessRisk::High | StalenessRisk::Medium)) => {
            format!(" -- {} staleness", risk.as_str())
        }
        _ => String::new(),
    };

    if confidence.is_none() && staleness_str.is_empty() {
        return String::new();
    }

    format!("[{}{}]", confidence.unwrap_or("unrated"), staleness_str)
}

/// 텍스트 자르기 (UTF-8 안전)
fn truncate_text(text: &str, max_chars: usize) -> String {
    let cleaned = text.replace('\n', " ").replace('\r', "");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() <= max_chars {
        cleaned.to_string()
    } else {
        let truncated: String = cleaned.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

// ============================================================================
// Tests
// ============================================================================
