use crate::config::Config;
use crate::infrastructure::{HttpGateway, RemoteGateway};
use crate::models::{load_file, scan_folder, BatchKind, SessionState};
use crate::services::{AggregationView, ReportWriter};
use crate::utils::logging;
use crate::workflow::{ActionOutcome, WorkflowController};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    gateway: Arc<dyn RemoteGateway>,
    controller: WorkflowController,
    writer: ReportWriter,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(&config.api_base_url, config.max_upload_mib);

        let gateway: Arc<dyn RemoteGateway> = Arc::new(HttpGateway::new(&config.api_base_url)?);

        Ok(Self::with_gateway(config, gateway))
    }

    /// 使用指定网关创建（测试时替换远端实现）
    pub fn with_gateway(config: Config, gateway: Arc<dyn RemoteGateway>) -> Self {
        let controller = WorkflowController::from_config(&config, gateway.clone());
        let writer = ReportWriter::new(&config.output_dir);
        Self {
            config,
            gateway,
            controller,
            writer,
        }
    }

    /// 运行一次完整的对账会话
    ///
    /// 返回会话结束时的状态快照。
    pub async fn run(&self) -> Result<SessionState> {
        // 扫描待上传的 PDF
        info!("\n📁 正在扫描错误 PDF...");
        let pdfs = scan_folder(&self.config.pdf_folder, BatchKind::ErrorDocs).await?;

        if pdfs.is_empty() {
            warn!("⚠️ 没有找到待上传的 PDF 文件，程序结束");
            return Ok(self.finish());
        }

        if !self.step(self.controller.submit_error_docs(pdfs).await) {
            return Ok(self.finish());
        }

        // 进口记录表
        let import = load_file(Path::new(&self.config.import_file)).await?;
        if !self.step(self.controller.submit_import_file(vec![import]).await) {
            return Ok(self.finish());
        }

        if !self.controller.can_trigger_processing() {
            warn!("⚠️ 存在错误，跳过服务端处理");
            return Ok(self.finish());
        }

        if !self.step(self.controller.trigger_processing().await) {
            return Ok(self.finish());
        }

        self.step(self.controller.refresh_records().await);
        self.write_outputs().await;

        if self.config.clear_after_run {
            self.step(self.controller.clear_session().await);
        }

        Ok(self.finish())
    }

    /// 记录动作结果和状态行，返回是否成功
    fn step(&self, outcome: ActionOutcome) -> bool {
        logging::log_status(&self.controller.status_line());
        if !outcome.is_completed() {
            warn!("动作未完成: {:?}", outcome);
        }
        outcome.is_completed()
    }

    /// 输出汇总并下载报告
    async fn write_outputs(&self) {
        let state = self.controller.snapshot();
        let view = AggregationView::new(&state.records);

        info!("\n{}", "─".repeat(60));
        info!("🧾 {}", view.heading());
        for (line, group) in view.summary_lines().into_iter().zip(view.groups()) {
            info!("  {}", line);
            for record in &group.records {
                debug!("    {}", logging::record_line(record));
            }
        }
        info!("{}", "─".repeat(60));

        if !view.is_empty() {
            match self.writer.write_summary(&view).await {
                Ok(path) => info!("📝 汇总已写入: {}", path.display()),
                Err(e) => error!("写入汇总失败: {}", e),
            }
        }

        let Some(artifact) = state.output_artifact else {
            return;
        };

        info!("⬇️ 正在下载报告: {}", artifact);
        match self.gateway.download_report(&artifact).await {
            Ok(data) => match self.writer.write_report(&artifact, &data).await {
                Ok(path) => info!("✅ 报告已保存: {}", path.display()),
                Err(e) => error!("保存报告失败: {}", e),
            },
            Err(e) => error!("下载报告失败 ({}): {}", artifact, e),
        }
    }

    fn finish(&self) -> SessionState {
        let state = self.controller.snapshot();
        logging::print_final_stats(&state, &self.config.output_log_file);
        state
    }
}
