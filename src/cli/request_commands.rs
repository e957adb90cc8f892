use crate::core::platform::container::clearance_request::{
    ClearanceRequest, ClearanceStatus, DepartmentRef, StudentRef,
};
use crate::core::platform::manager::clearance_service::{BatchOutcome, ClearanceService};
use clap::{Args, Subcommand};
use std::sync::Arc;

#[derive(Debug, Subcommand)]
pub enum RequestCommands {
    /// Submit a clearance request to a department
    Submit(SubmitArgs),
    /// Approve a pending request
    Approve(ApproveArgs),
    /// Reject a pending request
    Reject(RejectArgs),
    /// List requests
    List(ListRequestsArgs),
    /// Show a student's clearance progress
    Summary(SummaryArgs),
    /// List the pending requests awaiting a department
    Queue(QueueArgs),
    /// Show request counts across all departments
    Stats,
    /// Approve several pending requests at once
    ApproveAll(ApproveAllArgs),
    /// Reject several pending requests at once with one reason
    RejectAll(RejectAllArgs),
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    #[arg(long)]
    pub student_id: String,

    #[arg(long)]
    pub student_name: String,

    #[arg(long)]
    pub department_id: String,

    #[arg(long)]
    pub department_name: String,
}

#[derive(Debug, Args)]
pub struct ApproveArgs {
    /// Request ID
    pub id: String,

    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(Debug, Args)]
pub struct RejectArgs {
    /// Request ID
    pub id: String,

    /// Reason shown to the student
    #[arg(long)]
    pub comment: String,
}

#[derive(Debug, Args)]
pub struct ListRequestsArgs {
    /// pending, approved or rejected
    #[arg(short, long)]
    pub status: Option<ClearanceStatus>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    pub student_id: String,
}

#[derive(Debug, Args)]
pub struct QueueArgs {
    pub department_id: String,
}

#[derive(Debug, Args)]
pub struct ApproveAllArgs {
    /// Request IDs; defaults to every pending request in scope
    pub ids: Vec<String>,

    /// Limit the default selection to one department
    #[arg(long)]
    pub department: Option<String>,

    #[arg(long)]
    pub comment: Option<String>,
}

#[derive(Debug, Args)]
pub struct RejectAllArgs {
    /// Request IDs; defaults to every pending request in scope
    pub ids: Vec<String>,

    /// Limit the default selection to one department
    #[arg(long)]
    pub department: Option<String>,

    /// Reason shown to every student
    #[arg(long)]
    pub comment: String,
}

pub struct RequestCommandHandler {
    service: Arc<ClearanceService>,
}

impl RequestCommandHandler {
    pub fn new(service: Arc<ClearanceService>) -> Self {
        Self { service }
    }

    pub fn handle_command(&self, command: RequestCommands) -> Result<(), Box<dyn std::error::Error>> {
        match command {
            RequestCommands::Submit(args) => {
                let request = self.service.submit_request(
                    StudentRef { id: args.student_id, name: args.student_name },
                    DepartmentRef { id: args.department_id, name: args.department_name },
                )?;
                println!("✅ Clearance request submitted");
                print_request(&request);
            }
            RequestCommands::Approve(args) => {
                let request = self.service.approve(&args.id, args.comment)?;
                println!("✅ Clearance request approved");
                print_request(&request);
            }
            RequestCommands::Reject(args) => {
                let request = self.service.reject(&args.id, args.comment)?;
                println!("❌ Clearance request rejected");
                print_request(&request);
            }
            RequestCommands::List(args) => {
                let requests = self.service.list(args.status)?;
                if requests.is_empty() {
                    println!("No clearance requests");
                }
                for request in &requests {
                    print_request(request);
                }
            }
            RequestCommands::Summary(args) => {
                let summary = self.service.clearance_summary(&args.student_id)?;
                println!("🎓 Clearance summary for {}:", summary.student_id);
                println!("   Requests: {}", summary.total);
                println!("   Pending: {}", summary.pending);
                println!("   Approved: {}", summary.approved);
                println!("   Rejected: {}", summary.rejected);
                println!("   Fully cleared: {}", summary.fully_cleared);
            }
            RequestCommands::Queue(args) => {
                let queue = self.service.department_queue(&args.department_id)?;
                println!("📋 {} pending request(s) for {}", queue.len(), args.department_id);
                for request in &queue {
                    print_request(request);
                }
            }
            RequestCommands::Stats => {
                let stats = self.service.system_stats()?;
                println!("📊 Clearance statistics:");
                println!("   Requests: {}", stats.total);
                println!("   Pending: {}", stats.pending);
                println!("   Approved: {}", stats.approved);
                println!("   Rejected: {}", stats.rejected);
            }
            RequestCommands::ApproveAll(args) => {
                let ids = self.selection(args.ids, args.department.as_deref())?;
                let outcome = self.service.approve_all(&ids, args.comment);
                println!("✅ Approved {} request(s)", outcome.succeeded.len());
                print_failures(&outcome);
            }
            RequestCommands::RejectAll(args) => {
                let ids = self.selection(args.ids, args.department.as_deref())?;
                let outcome = self.service.reject_all(&ids, args.comment)?;
                println!("❌ Rejected {} request(s)", outcome.succeeded.len());
                print_failures(&outcome);
            }
        }
        Ok(())
    }

    /// Explicit ids win; otherwise every pending request, optionally for one department
    fn selection(
        &self,
        ids: Vec<String>,
        department: Option<&str>,
    ) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        if !ids.is_empty() {
            return Ok(ids);
        }

        let pending = match department {
            Some(department_id) => self.service.department_queue(department_id)?,
            None => self.service.list(Some(ClearanceStatus::Pending))?,
        };
        Ok(pending.into_iter().map(|r| r.id).collect())
    }
}

fn print_failures(outcome: &BatchOutcome) {
    for (id, error) in &outcome.failed {
        println!("⚠️  {}: {}", id, error);
    }
}

fn print_request(request: &ClearanceRequest) {
    println!("   ID: {}", request.id);
    println!("   Student: {} ({})", request.student_name, request.student_id);
    println!("   Department: {} ({})", request.department_name, request.department_id);
    println!("   Status: {}", request.status);
    println!("   Requested: {}", request.request_date.format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(comment) = &request.comment {
        println!("   Comment: {}", comment);
    }
}
