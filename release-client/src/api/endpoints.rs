//! Every RelEase backend operation.

use super::Endpoint;
use crate::models::accounts::{
    CreateAccountRequest, CreateAccountResponse, LoginRequest, LoginResponse, LogoutResponse,
    ManageApprovalRequest, MeResponse, PendingResponse, UpdateAccountPayload,
};
use crate::models::chat::{
    ChatRequest, ChatResponse, ChatSessionRequest, DeleteChatResponse, GetAllChatSessionsResponse,
    GetChatResponse,
};
use crate::models::general::{AckResponse, PingResponse};
use crate::models::releases::{
    AllReleaseResponse, ConstantResponse, ConstantUserResponse, CreateReleaseRequest,
    DeleteReleaseRequest, DeleteSnapshotRequest, GetDeploymentSnapshotResponse,
    GetReleaseResponse, ReleaseQuery, RevokeApprovalQuery, UpdateReleaseRequest,
};
use crate::models::tickets::{AllTicketsResponse, CreateTicketRequest, CreateTicketResponse};

// Accounts

pub const ACCOUNTS_API_LOGIN: Endpoint<LoginRequest, LoginResponse> =
    Endpoint::post_json("accountsApiLogin", "/api/accounts/login");

pub const ACCOUNTS_API_CREATE_ACCOUNT: Endpoint<CreateAccountRequest, CreateAccountResponse> =
    Endpoint::post_json("accountsApiCreateAccount", "/api/accounts/create");

pub const ACCOUNTS_API_ME: Endpoint<(), MeResponse> =
    Endpoint::get("accountsApiMe", "/api/accounts/me");

pub const ACCOUNTS_API_ALL_PENDING: Endpoint<(), PendingResponse> =
    Endpoint::get("accountsApiAllPending", "/api/accounts/pending");

pub const ACCOUNTS_API_UPDATE_ACCOUNT: Endpoint<UpdateAccountPayload, AckResponse> =
    Endpoint::post_json("accountsApiUpdateAccount", "/api/accounts/update");

pub const ACCOUNTS_API_MANAGE_APPROVAL: Endpoint<ManageApprovalRequest, AckResponse> =
    Endpoint::post_json("accountsApiManageApproval", "/api/accounts/manage_approval");

pub const ACCOUNTS_API_LOGOUT: Endpoint<(), LogoutResponse> =
    Endpoint::post("accountsApiLogout", "/api/accounts/logout");

// General

pub const APP_API_PUBLIC_PING_DETAILS: Endpoint<(), PingResponse> =
    Endpoint::get("appApiPublicPingDetails", "/api/general/ping/public");

pub const APP_API_PRIVATE_PING_DETAILS: Endpoint<(), PingResponse> =
    Endpoint::get("appApiPrivatePingDetails", "/api/general/ping/private");

// Tickets

pub const TICKETS_API_CREATE_TICKET: Endpoint<CreateTicketRequest, CreateTicketResponse> =
    Endpoint::post_json("ticketsApiCreateTicket", "/api/tickets/create");

pub const TICKETS_API_GET_ALL_TICKETS: Endpoint<(), AllTicketsResponse> =
    Endpoint::get("ticketsApiGetAllTickets", "/api/tickets/all");

// Releases

pub const RELEASES_API_GET_CONSTANT_AND_USERS: Endpoint<(), ConstantUserResponse> =
    Endpoint::get("releasesApiGetConstantAndUsers", "/api/releases/constant");

pub const RELEASES_API_POST_CONSTANT: Endpoint<Vec<String>, ConstantResponse> =
    Endpoint::post_json("releasesApiPostConstant", "/api/releases/constant");

pub const RELEASES_API_CREATE_RELEASE: Endpoint<CreateReleaseRequest, AckResponse> =
    Endpoint::post_json("releasesApiCreateRelease", "/api/releases/create");

pub const RELEASES_API_UPDATE_RELEASE: Endpoint<UpdateReleaseRequest, AckResponse> =
    Endpoint::post_json("releasesApiUpdateRelease", "/api/releases/update");

pub const RELEASES_API_DELETE_RELEASE: Endpoint<DeleteReleaseRequest, AckResponse> =
    Endpoint::post_json("releasesApiDeleteRelease", "/api/releases/delete");

pub const RELEASES_API_GET_ALL_RELEASES: Endpoint<(), AllReleaseResponse> =
    Endpoint::get("releasesApiGetAllReleases", "/api/releases/all");

pub const RELEASES_API_GET_RELEASE_WITH_UUID: Endpoint<ReleaseQuery, GetReleaseResponse> =
    Endpoint::get_query("releasesApiGetReleaseWithUuid", "/api/releases/release");

pub const RELEASES_API_APPROVE_RELEASE: Endpoint<ReleaseQuery, AckResponse> =
    Endpoint::post_query("releasesApiApproveRelease", "/api/releases/approve");

pub const RELEASES_API_DELETE_PENDING_RELEASE_ITEMS: Endpoint<ReleaseQuery, AckResponse> =
    Endpoint::post_query(
        "releasesApiDeletePendingReleaseItems",
        "/api/releases/deleteReleaseItems",
    );

pub const RELEASES_API_REVOKE_APPROVAL: Endpoint<RevokeApprovalQuery, AckResponse> =
    Endpoint::post_query("releasesApiRevokeApproval", "/api/releases/revoke");

pub const RELEASES_API_DEPLOYMENT_SNAPSHOT: Endpoint<(), GetDeploymentSnapshotResponse> =
    Endpoint::get("releasesApiDeploymentSnapshot", "/api/releases/snapshots");

pub const RELEASES_API_DELETE_SNAPSHOT: Endpoint<DeleteSnapshotRequest, AckResponse> =
    Endpoint::post_json("releasesApiDeleteSnapshot", "/api/releases/delete-snapshot");

// Chat

pub const CHAT_API_CHAT: Endpoint<ChatRequest, ChatResponse> =
    Endpoint::post_json("chatApiChat", "/api/chat/chat");

pub const CHAT_API_GET_ALL_CHAT_SESSIONS: Endpoint<(), GetAllChatSessionsResponse> =
    Endpoint::get("chatApiGetAllChatSessions", "/api/chat/all");

pub const CHAT_API_GET_CHAT: Endpoint<ChatSessionRequest, GetChatResponse> =
    Endpoint::post_json("chatApiGetChat", "/api/chat/get-chat");

pub const CHAT_API_DELETE_CHAT: Endpoint<ChatSessionRequest, DeleteChatResponse> =
    Endpoint::post_json("chatApiDeleteChat", "/api/chat/delete");
